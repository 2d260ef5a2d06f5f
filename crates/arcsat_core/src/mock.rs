use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    Address, BusinessRecord, GeoPoint,
    cities::{self, CITIES, City},
};

const SUPPLIER_SHARE_THRESHOLD: f64 = 0.6;
const COOPERATIVE_THRESHOLD: f64 = 0.7;
const COORD_JITTER_DEG: f64 = 0.5;

const SUPPLIER_BRANDS: [&str; 20] = [
    "John Deere", "Case IH", "New Holland", "Massey Ferguson", "Valtra", "Jacto", "Stara",
    "Kuhn", "Marchesan", "Jumil", "Bunge", "Cargill", "ADM", "Yara", "Mosaic", "Corteva",
    "Basf", "Syngenta", "FMC", "Nufarm",
];

const FARMS: [&str; 12] = [
    "Fazenda Santa Maria", "Fazenda Boa Vista", "Agropecuária Moderna", "Fazenda Esperança",
    "Fazenda São José", "Fazenda Primavera", "Fazenda Bela Vista", "Fazenda Progresso",
    "Fazenda Futuro", "Fazenda União", "Fazenda Harmonia", "Fazenda Vitória",
];

const COOPERATIVES: [&str; 6] = [
    "Cooperativa Vale Verde", "Cooperativa Agrícola Regional", "Cooperativa Central",
    "Cooperativa do Cerrado", "Cooperativa Mista Rural", "Cooperativa Tritícola",
];

const SUPPLIER_SECTORS: [&str; 2] = ["Automotiva Agrícola", "Insumos Agrícolas"];
const SUPPLIER_TIERS: [&str; 3] = [
    "Fornecedor Premium",
    "Fornecedor Nacional",
    "Fornecedor Internacional",
];
const FARM_TIERS: [&str; 3] = ["Cliente Gold", "Cliente Enterprise", "Cliente Premium"];
const EMAIL_DOMAINS: [&str; 4] = [
    "agro.com.br",
    "rural.com.br",
    "fazenda.com.br",
    "agronegocio.com.br",
];

/// Seeded generator of plausible business records around [`CITIES`].
///
/// Used when no records file is available. The same seed always yields the
/// same records.
pub struct MockGenerator {
    rng: StdRng,
}

impl MockGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn generate(&mut self, count: usize) -> Vec<BusinessRecord> {
        let records: Vec<BusinessRecord> = (0..count).map(|i| self.record(i)).collect();
        log::info!("mock: generated n={} demonstration records", records.len());
        records
    }

    fn record(&mut self, idx: usize) -> BusinessRecord {
        let city = *self.pick(&CITIES);
        let is_supplier = self.rng.random::<f64>() > SUPPLIER_SHARE_THRESHOLD;

        let (nome, setor, categoria) = if is_supplier {
            let brand = self.pick(&SUPPLIER_BRANDS);
            (
                format!("{brand} {}", city.name),
                *self.pick(&SUPPLIER_SECTORS),
                *self.pick(&SUPPLIER_TIERS),
            )
        } else if self.rng.random::<f64>() > COOPERATIVE_THRESHOLD {
            let coop = self.pick(&COOPERATIVES);
            (
                format!("{coop} de {}", city.name),
                "Cooperativa",
                "Cliente Corporativo",
            )
        } else {
            let farm = self.pick(&FARMS);
            let setor = if self.rng.random::<f64>() > 0.6 {
                "Produtor Rural"
            } else {
                "Pecuária"
            };
            (format!("{farm} {}", idx + 1), setor, *self.pick(&FARM_TIERS))
        };

        let position = self.jittered(city);
        let cnpj = self.cnpj();
        let telefone = self.phone(city.uf);
        let email = self.email(&nome);

        BusinessRecord {
            nome: Some(nome),
            setor: Some(setor.to_string()),
            categoria: Some(categoria.to_string()),
            endereco: Some(Address::Text(format!("{}, {}", city.name, city.uf))),
            position,
            cnpj: Some(cnpj),
            telefone: Some(telefone),
            email: Some(email),
            ..BusinessRecord::default()
        }
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.rng.random_range(0..items.len())]
    }

    fn jittered(&mut self, city: City) -> Option<GeoPoint> {
        let lat_offset = (self.rng.random::<f64>() - 0.5) * COORD_JITTER_DEG;
        let lng_offset = (self.rng.random::<f64>() - 0.5) * COORD_JITTER_DEG;
        // falls back to geocoding the city address if the jitter leaves the valid range
        GeoPoint::new(city.lat + lat_offset, city.lng + lng_offset).ok()
    }

    fn cnpj(&mut self) -> String {
        let base = self.rng.random_range(10_000_000..100_000_000u32).to_string();
        let check = self.rng.random_range(10..100u32);
        format!(
            "{}.{}.{}/0001-{check}",
            &base[..2],
            &base[2..5],
            &base[5..]
        )
    }

    fn phone(&mut self, uf: &str) -> String {
        let ddd = self.pick(cities::area_codes(uf));
        let number = self.rng.random_range(100_000_000..1_000_000_000u32).to_string();
        format!("+55 {ddd} {}-{}", &number[..5], &number[5..])
    }

    fn email(&mut self, name: &str) -> String {
        let domain = self.pick(&EMAIL_DOMAINS);
        format!("contato@{}.{domain}", email_local_part(name))
    }
}

/// First two words of `name`, lowercased, accents folded, punctuation dropped.
fn email_local_part(name: &str) -> String {
    let folded: String = name
        .to_lowercase()
        .chars()
        .map(fold_accent)
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();
    folded.split_whitespace().take(2).collect()
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::{MockGenerator, email_local_part};
    use crate::{Category, Classifier, KeywordClassifier, cities::CITIES};

    #[test]
    fn same_seed_yields_same_records() {
        let a = MockGenerator::new(7).generate(30);
        let b = MockGenerator::new(7).generate(30);
        assert_eq!(a, b);
        assert_eq!(a.len(), 30);
    }

    #[test]
    fn records_stay_near_a_known_city() {
        for record in MockGenerator::new(11).generate(200) {
            let position = record.position.expect("mock records carry a position");
            let near_city = CITIES.iter().any(|c| {
                (position.latitude() - c.lat).abs() <= 0.2501
                    && (position.longitude() - c.lng).abs() <= 0.2501
            });
            assert!(near_city, "{position} is not near any city");
            assert!(record.formatted_address().is_some());
        }
    }

    #[test]
    fn records_classify_as_supplier_or_buyer() {
        let classifier = KeywordClassifier::default();
        let records = MockGenerator::new(3).generate(300);
        let mut suppliers = 0;
        for record in &records {
            let category = classifier.classify(record.setor.as_deref(), record.categoria.as_deref());
            assert_ne!(category, Category::Client);
            if category == Category::Supplier {
                suppliers += 1;
            }
        }
        // about 40% suppliers
        assert!((60..=180).contains(&suppliers), "suppliers={suppliers}");
    }

    #[test]
    fn identifiers_follow_brazilian_formats() {
        let record = MockGenerator::new(5).generate(1).remove(0);

        let cnpj = record.cnpj.expect("cnpj");
        assert_eq!(cnpj.len(), "12.345.678/0001-99".len());
        assert_eq!(&cnpj[2..3], ".");
        assert_eq!(&cnpj[10..16], "/0001-");

        let phone = record.telefone.expect("phone");
        assert!(phone.starts_with("+55 "));
        assert_eq!(phone.len(), "+55 11 12345-6789".len());

        let email = record.email.expect("email");
        assert!(email.starts_with("contato@"));
        assert!(email.ends_with(".com.br"));
    }

    #[test]
    fn email_local_part_folds_accents_and_keeps_two_words() {
        assert_eq!(email_local_part("Fazenda São José 12"), "fazendasao");
        assert_eq!(email_local_part("Agropecuária Moderna"), "agropecuariamoderna");
        assert_eq!(email_local_part("Case IH Ribeirão Preto"), "caseih");
    }
}

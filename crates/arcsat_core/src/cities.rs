//! Fixed table of agribusiness hubs used by the mock generator and the offline geocoder.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct City {
    pub name: &'static str,
    pub uf: &'static str,
    pub lat: f64,
    pub lng: f64,
}

const fn city(name: &'static str, uf: &'static str, lat: f64, lng: f64) -> City {
    City { name, uf, lat, lng }
}

pub const CITIES: [City; 20] = [
    city("Campinas", "SP", -22.9099, -47.0626),
    city("Ribeirão Preto", "SP", -21.1699, -47.8099),
    city("Santos", "SP", -23.9618, -46.3322),
    city("Uberaba", "MG", -19.7479, -47.9381),
    city("Uberlândia", "MG", -18.9188, -48.2766),
    city("Sorocaba", "SP", -23.5015, -47.4526),
    city("Goiânia", "GO", -16.6869, -49.2648),
    city("Campo Grande", "MS", -20.4697, -54.6201),
    city("Curitiba", "PR", -25.4284, -49.2733),
    city("Londrina", "PR", -23.3045, -51.1696),
    city("Cascavel", "PR", -24.9555, -53.4552),
    city("Brasília", "DF", -15.7939, -47.8828),
    city("Dourados", "MS", -22.2211, -54.8056),
    city("Rio Verde", "GO", -17.7939, -50.9261),
    city("Sorriso", "MT", -12.5417, -55.7139),
    city("Sinop", "MT", -11.8644, -55.5050),
    city("Lucas do Rio Verde", "MT", -13.0536, -55.9050),
    city("Rondonópolis", "MT", -16.4706, -54.6356),
    city("Patos de Minas", "MG", -18.5789, -46.5183),
    city("Paracatu", "MG", -17.2217, -46.8750),
];

/// Area codes per state, for synthetic phone numbers.
pub fn area_codes(uf: &str) -> &'static [&'static str] {
    match uf {
        "SP" => &["11", "12", "13", "14", "15", "16", "17", "18", "19"],
        "MG" => &["31", "32", "33", "34", "35", "37", "38"],
        "GO" => &["62", "64"],
        "MS" => &["67"],
        "PR" => &["41", "42", "43", "44", "45", "46"],
        "MT" => &["65", "66"],
        "DF" => &["61"],
        _ => &["11"],
    }
}

/// Case-insensitive lookup by city name, optionally qualified by state.
pub fn find(name: &str, uf: Option<&str>) -> Option<&'static City> {
    let name = name.trim().to_lowercase();
    CITIES.iter().find(|c| {
        c.name.to_lowercase() == name
            && uf.is_none_or(|uf| c.uf.eq_ignore_ascii_case(uf.trim()))
    })
}

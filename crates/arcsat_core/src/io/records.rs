use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Deserializer, Serialize};

use crate::{Classifier, Error, GeoPoint, LocatedEntity, Result};

const UNNAMED: &str = "unnamed";

/// One entry of the business-records JSON collection.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub razao_social: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nome: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cnpj: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categoria: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endereco: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telefone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Already-known coordinates; skips geocoding when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<GeoPoint>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Address {
    Text(String),
    Parts(AddressParts),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressParts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logradouro: Option<String>,
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub numero: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bairro: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub municipio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uf: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cep: Option<String>,
}

/// Link between two records, e.g. a contact and the client it belongs to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RelationshipLink {
    #[serde(alias = "origem", alias = "contato")]
    pub from: String,
    #[serde(alias = "destino", alias = "cliente")]
    pub to: String,
    #[serde(default, alias = "tipo", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// A record with a usable address, waiting for coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingLocation {
    pub id: String,
    pub address: String,
    pub record: BusinessRecord,
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
    }))
}

impl Address {
    /// Comma-joined address suitable for a geocoding query.
    pub fn format(&self) -> String {
        match self {
            Self::Text(text) => text.trim().to_string(),
            Self::Parts(parts) => parts.format(),
        }
    }
}

impl AddressParts {
    pub fn format(&self) -> String {
        [
            &self.logradouro,
            &self.numero,
            &self.bairro,
            &self.municipio,
            &self.uf,
            &self.cep,
        ]
        .into_iter()
        .filter_map(|part| part.as_deref().map(str::trim))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

impl BusinessRecord {
    pub fn display_name(&self) -> &str {
        self.razao_social
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or(self.nome.as_deref().filter(|s| !s.trim().is_empty()))
            .unwrap_or(UNNAMED)
    }

    pub fn formatted_address(&self) -> Option<String> {
        self.endereco
            .as_ref()
            .map(Address::format)
            .filter(|a| !a.is_empty())
    }

    pub fn into_entity(
        self,
        id: impl Into<String>,
        location: GeoPoint,
        classifier: &dyn Classifier,
    ) -> LocatedEntity {
        let category = classifier.classify(self.setor.as_deref(), self.categoria.as_deref());
        let mut entity = LocatedEntity::new(id, self.display_name(), category, location);

        let address = self.formatted_address();
        let attributes = [
            ("sector", self.setor),
            ("classification", self.categoria),
            ("address", address),
            ("tax_id", self.cnpj),
            ("phone", self.telefone),
            ("email", self.email),
        ];
        for (key, value) in attributes {
            if let Some(value) = value {
                entity = entity.with_attribute(key, value);
            }
        }
        entity
    }
}

/// Records that carry an address, in input order. Ids are the record's
/// position in the original collection.
pub fn pending_locations(records: Vec<BusinessRecord>) -> Vec<PendingLocation> {
    let total = records.len();
    let pending: Vec<PendingLocation> = records
        .into_iter()
        .enumerate()
        .filter_map(|(idx, record)| {
            let address = record.formatted_address()?;
            Some(PendingLocation {
                id: (idx + 1).to_string(),
                address,
                record,
            })
        })
        .collect();

    if pending.len() < total {
        log::info!(
            "records: skipped {} of {total} without an address",
            total - pending.len()
        );
    }
    pending
}

pub fn load_records(path: &Path) -> Result<Vec<BusinessRecord>> {
    read_json_array(path)
}

pub fn load_links(path: &Path) -> Result<Vec<RelationshipLink>> {
    read_json_array(path)
}

fn read_json_array<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path).map_err(|e| {
        Error::invalid_input(format!("failed to open {}: {e}", path.display()))
    })?;
    let items: Vec<T> = serde_json::from_reader(BufReader::new(file))?;
    log::debug!("records: loaded n={} from {}", items.len(), path.display());
    Ok(items)
}

use std::{fs::File, io::Write, path::Path};

use csv::{QuoteStyle, WriterBuilder};

use crate::{LocatedEntity, Result, RouteResult};

const ENTITY_ATTRIBUTES: [&str; 3] = ["sector", "classification", "address"];

/// Writes rows as CSV with every field quoted and no header row.
pub fn write_csv<W, R, F>(rows: R, writer: W) -> Result<usize>
where
    W: Write,
    R: IntoIterator<Item = Vec<F>>,
    F: AsRef<[u8]>,
{
    let mut csv = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Always)
        .flexible(true)
        .from_writer(writer);

    let mut written = 0;
    for row in rows {
        csv.write_record(&row)?;
        written += 1;
    }
    csv.flush()?;
    Ok(written)
}

pub fn write_csv_file<R, F>(rows: R, path: &Path) -> Result<usize>
where
    R: IntoIterator<Item = Vec<F>>,
    F: AsRef<[u8]>,
{
    let written = write_csv(rows, File::create(path)?)?;
    log::info!("export: wrote rows={written} to {}", path.display());
    Ok(written)
}

/// `id, name, category, lat, lng, sector, classification, address`
pub fn entity_rows(entities: &[LocatedEntity]) -> Vec<Vec<String>> {
    entities
        .iter()
        .map(|e| {
            let mut row = vec![
                e.id.clone(),
                e.display_name.clone(),
                e.category.to_string(),
                e.location.latitude().to_string(),
                e.location.longitude().to_string(),
            ];
            row.extend(
                ENTITY_ATTRIBUTES
                    .iter()
                    .map(|key| e.attribute(key).unwrap_or_default().to_string()),
            );
            row
        })
        .collect()
}

/// `stop, name, category, lat, lng, leg_km`; `leg_km` is the distance from the
/// previous stop, empty for the first stop or when the leg is unknown.
pub fn route_rows(route: &RouteResult) -> Vec<Vec<String>> {
    route
        .ordered_entities
        .iter()
        .enumerate()
        .map(|(idx, e)| {
            let leg_km = idx
                .checked_sub(1)
                .and_then(|prev| route.leg_distances_m.get(prev))
                .map(|m| format!("{:.3}", m / 1_000.0))
                .unwrap_or_default();
            vec![
                (idx + 1).to_string(),
                e.display_name.clone(),
                e.category.to_string(),
                e.location.latitude().to_string(),
                e.location.longitude().to_string(),
                leg_km,
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{entity_rows, route_rows, write_csv, write_csv_file};
    use crate::{Category, GeoPoint, LocatedEntity, RouteResult, optimize_route};

    fn entity(id: &str, name: &str, lat: f64, lng: f64) -> LocatedEntity {
        LocatedEntity::new(
            id,
            name,
            Category::Supplier,
            GeoPoint::new(lat, lng).expect("valid point"),
        )
    }

    fn render(rows: Vec<Vec<String>>) -> String {
        let mut out = Vec::new();
        write_csv(rows, &mut out).expect("write csv");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn every_field_is_quoted_and_rows_end_with_newline() {
        let text = render(vec![
            vec!["a".to_string(), "1".to_string()],
            vec!["b, c".to_string(), String::new()],
        ]);
        assert_eq!(text, "\"a\",\"1\"\n\"b, c\",\"\"\n");
    }

    #[test]
    fn embedded_quotes_are_escaped() {
        let text = render(vec![vec!["Fazenda \"Boa\" Vista".to_string()]]);
        assert_eq!(text, "\"Fazenda \"\"Boa\"\" Vista\"\n");
    }

    #[test]
    fn entity_rows_flatten_known_attributes() {
        let e = entity("1", "Stara Londrina", -23.3045, -51.1696)
            .with_attribute("sector", "Automotiva Agrícola")
            .with_attribute("tax_id", "12.345.678/0001-10");
        let rows = entity_rows(&[e]);
        assert_eq!(
            rows[0],
            vec![
                "1",
                "Stara Londrina",
                "supplier",
                "-23.3045",
                "-51.1696",
                "Automotiva Agrícola",
                "",
                ""
            ]
        );
    }

    #[test]
    fn route_rows_leave_missing_legs_empty() {
        let route = RouteResult {
            ordered_entities: vec![
                entity("a", "A", 0.0, 0.0),
                entity("b", "B", 1.0, 0.0),
                entity("c", "C", 2.0, 0.0),
            ],
            total_distance_km: 1.5,
            leg_distances_m: vec![1_500.0],
        };
        let rows = route_rows(&route);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1][5], "1.500");
        assert_eq!(rows[2][5], "");
    }

    #[test]
    fn route_rows_number_stops_and_report_legs() {
        let route = optimize_route(&[
            entity("a", "A", 0.0, 0.0),
            entity("b", "B", 1.0, 0.0),
        ])
        .expect("route");
        let rows = route_rows(&route);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], "1");
        assert_eq!(rows[0][5], "");
        assert_eq!(rows[1][5], "111.195");
    }

    #[test]
    fn write_csv_file_creates_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("entities.csv");
        let written = write_csv_file(vec![vec!["x"]], &path).expect("write file");
        assert_eq!(written, 1);
        assert_eq!(std::fs::read_to_string(&path).expect("read back"), "\"x\"\n");
    }
}

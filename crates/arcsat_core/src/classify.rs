use crate::Category;

/// Maps a record's free-text sector and category to a [`Category`].
pub trait Classifier {
    fn classify(&self, sector: Option<&str>, category: Option<&str>) -> Category;
}

/// Substring heuristic over Portuguese business labels.
///
/// Supplier wins over buyer when both match. Anything unmatched is a generic client.
#[derive(Clone, Debug)]
pub struct KeywordClassifier {
    supplier_category: Vec<String>,
    supplier_sector: Vec<String>,
    buyer_category: Vec<String>,
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self {
            supplier_category: vec!["fornecedor".into()],
            supplier_sector: vec!["industria".into()],
            buyer_category: vec!["comprador".into(), "cliente".into()],
        }
    }
}

impl KeywordClassifier {
    pub fn with_supplier_sector(mut self, keyword: impl Into<String>) -> Self {
        self.supplier_sector.push(keyword.into().to_lowercase());
        self
    }

    pub fn with_buyer_category(mut self, keyword: impl Into<String>) -> Self {
        self.buyer_category.push(keyword.into().to_lowercase());
        self
    }
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|n| haystack.contains(n.as_str()))
}

impl Classifier for KeywordClassifier {
    fn classify(&self, sector: Option<&str>, category: Option<&str>) -> Category {
        let category = category.unwrap_or_default().to_lowercase();
        let sector = sector.unwrap_or_default().to_lowercase();

        if contains_any(&category, &self.supplier_category)
            || contains_any(&sector, &self.supplier_sector)
        {
            Category::Supplier
        } else if contains_any(&category, &self.buyer_category) {
            Category::Buyer
        } else {
            Category::Client
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Classifier, KeywordClassifier};
    use crate::Category;

    #[test]
    fn supplier_keywords_match_category_or_sector() {
        let c = KeywordClassifier::default();
        assert_eq!(
            c.classify(Some("Insumos Agrícolas"), Some("Fornecedor Premium")),
            Category::Supplier
        );
        assert_eq!(c.classify(Some("Industria Química"), None), Category::Supplier);
    }

    #[test]
    fn buyer_keywords_match_category_only() {
        let c = KeywordClassifier::default();
        assert_eq!(c.classify(Some("Pecuária"), Some("Cliente Gold")), Category::Buyer);
        assert_eq!(c.classify(None, Some("COMPRADOR regional")), Category::Buyer);
        assert_eq!(c.classify(Some("cliente"), None), Category::Client);
    }

    #[test]
    fn supplier_takes_precedence_over_buyer() {
        let c = KeywordClassifier::default();
        assert_eq!(
            c.classify(Some("industria"), Some("Cliente Corporativo")),
            Category::Supplier
        );
    }

    #[test]
    fn unmatched_and_missing_fields_fall_back_to_client() {
        let c = KeywordClassifier::default();
        assert_eq!(c.classify(None, None), Category::Client);
        assert_eq!(c.classify(Some("Distribuidor"), Some("Parceiro")), Category::Client);
    }

    #[test]
    fn extra_keywords_extend_the_defaults() {
        let c = KeywordClassifier::default()
            .with_supplier_sector("Concessionária")
            .with_buyer_category("parceiro");
        assert_eq!(c.classify(Some("concessionária"), None), Category::Supplier);
        assert_eq!(c.classify(None, Some("Parceiro")), Category::Buyer);
    }
}

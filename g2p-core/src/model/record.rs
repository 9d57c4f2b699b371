use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[cfg(feature = "backend")]
use diesel::sql_types::{Nullable, Text};

/// One row of the flattened LGD projection: a record joined against at most one
/// panel, variant consequence, variant type and molecular mechanism. A record
/// with several of each appears once per combination.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "backend", derive(diesel::QueryableByName))]
pub struct LgdSummaryRow {
    #[cfg_attr(feature = "backend", diesel(sql_type = Text))]
    pub stable_id: String,
    #[cfg_attr(feature = "backend", diesel(sql_type = Text))]
    pub locus: String,
    #[cfg_attr(feature = "backend", diesel(sql_type = Text))]
    pub disease: String,
    #[cfg_attr(feature = "backend", diesel(sql_type = Text))]
    pub genotype: String,
    #[cfg_attr(feature = "backend", diesel(sql_type = Text))]
    pub confidence: String,
    #[cfg_attr(feature = "backend", diesel(sql_type = Nullable<Text>))]
    pub panel: Option<String>,
    #[cfg_attr(feature = "backend", diesel(sql_type = Nullable<Text>))]
    pub variant_consequence: Option<String>,
    #[cfg_attr(feature = "backend", diesel(sql_type = Nullable<Text>))]
    pub variant_type: Option<String>,
    #[cfg_attr(feature = "backend", diesel(sql_type = Nullable<Text>))]
    pub molecular_mechanism: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct LgdSummary {
    pub stable_id: String,
    pub locus: String,
    pub disease: String,
    pub genotype: String,
    pub confidence: String,
    pub panels: Vec<String>,
    pub variant_consequence: Vec<String>,
    pub variant_type: Vec<String>,
    pub molecular_mechanism: Vec<String>,
}

impl LgdSummary {
    fn start(
        stable_id: String,
        LgdSummaryRow {
            locus,
            disease,
            genotype,
            confidence,
            ..
        }: &LgdSummaryRow,
    ) -> Self {
        Self {
            stable_id,
            locus: locus.clone(),
            disease: disease.clone(),
            genotype: genotype.clone(),
            confidence: confidence.clone(),
            panels: vec![],
            variant_consequence: vec![],
            variant_type: vec![],
            molecular_mechanism: vec![],
        }
    }
}

fn push_unique(list: &mut Vec<String>, value: Option<String>) {
    let Some(value) = value else {
        return;
    };

    if !list.contains(&value) {
        list.push(value);
    }
}

/// Folds flattened rows into one summary per stable id. Summaries come out in
/// the order their stable id first appears, list fields keep the order in which
/// values first appear, and null values are dropped.
pub fn fold_records(rows: impl IntoIterator<Item = LgdSummaryRow>) -> Vec<LgdSummary> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut summaries: Vec<LgdSummary> = Vec::new();

    for row in rows {
        let index = match positions.get(&row.stable_id).copied() {
            Some(index) => index,
            None => {
                summaries.push(LgdSummary::start(row.stable_id.clone(), &row));
                positions.insert(row.stable_id.clone(), summaries.len() - 1);

                summaries.len() - 1
            }
        };

        let LgdSummaryRow {
            panel,
            variant_consequence,
            variant_type,
            molecular_mechanism,
            ..
        } = row;

        let summary = &mut summaries[index];
        push_unique(&mut summary.panels, panel);
        push_unique(&mut summary.variant_consequence, variant_consequence);
        push_unique(&mut summary.variant_type, variant_type);
        push_unique(&mut summary.molecular_mechanism, molecular_mechanism);
    }

    summaries
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn row(
        stable_id: &str,
        panel: Option<&str>,
        consequence: Option<&str>,
        variant_type: Option<&str>,
        mechanism: Option<&str>,
    ) -> LgdSummaryRow {
        LgdSummaryRow {
            stable_id: stable_id.to_string(),
            locus: "PTPN11".to_string(),
            disease: "PTPN11-related Noonan syndrome".to_string(),
            genotype: "monoallelic_autosomal".to_string(),
            confidence: "definitive".to_string(),
            panel: panel.map(str::to_string),
            variant_consequence: consequence.map(str::to_string),
            variant_type: variant_type.map(str::to_string),
            molecular_mechanism: mechanism.map(str::to_string),
        }
    }

    #[test]
    fn rows_fold_by_stable_id_in_first_appearance_order() {
        let rows = vec![
            row("G2P00002", Some("DD"), None, None, None),
            row("G2P00001", Some("Cardiac"), None, None, None),
            row("G2P00002", Some("Skeletal"), None, None, None),
        ];

        let summaries = fold_records(rows);
        let ids: Vec<_> = summaries.iter().map(|s| s.stable_id.as_str()).collect();

        assert_eq!(ids, ["G2P00002", "G2P00001"]);
        assert_eq!(summaries[0].panels, ["DD", "Skeletal"]);
    }

    #[test]
    fn cartesian_rows_are_deduplicated() {
        let full_row = |panel, variant_type| {
            row(
                "G2P00001",
                Some(panel),
                Some("altered_gene_product_structure"),
                Some(variant_type),
                Some("gain of function"),
            )
        };
        let rows = vec![
            full_row("DD", "missense_variant"),
            full_row("DD", "inframe_deletion"),
            full_row("Cardiac", "missense_variant"),
            full_row("Cardiac", "inframe_deletion"),
        ];

        let summaries = fold_records(rows);

        assert_eq!(summaries.len(), 1);
        let summary = &summaries[0];
        assert_eq!(summary.panels, ["DD", "Cardiac"]);
        assert_eq!(summary.variant_consequence, ["altered_gene_product_structure"]);
        assert_eq!(summary.variant_type, ["missense_variant", "inframe_deletion"]);
        assert_eq!(summary.molecular_mechanism, ["gain of function"]);
    }

    #[test]
    fn null_values_are_dropped() {
        let rows = vec![
            row("G2P00001", None, None, None, None),
            row("G2P00001", Some("DD"), None, Some("missense_variant"), None),
        ];

        let summaries = fold_records(rows);

        let summary = &summaries[0];
        assert_eq!(summary.panels, ["DD"]);
        assert!(summary.variant_consequence.is_empty());
        assert_eq!(summary.variant_type, ["missense_variant"]);
        assert!(summary.molecular_mechanism.is_empty());
    }

    #[test]
    fn scalar_fields_come_from_the_first_row() {
        let summaries = fold_records(vec![row("G2P00001", None, None, None, None)]);

        assert_eq!(summaries[0].locus, "PTPN11");
        assert_eq!(summaries[0].genotype, "monoallelic_autosomal");
        assert_eq!(summaries[0].confidence, "definitive");
    }

    #[test]
    fn no_rows_no_summaries() {
        assert!(fold_records(Vec::new()).is_empty());
    }
}

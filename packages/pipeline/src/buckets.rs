// ABOUTME: Stage grouping for the deal board
// ABOUTME: Partitions a deal set into one ordered column per stage

use crm_core::{Deal, DealStage};

/// One ordered column of deals per stage.
///
/// Every deal handed to [`group_by_stage`] lands in exactly one column, in
/// the order it was supplied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageBuckets {
    open: Vec<Deal>,
    pending: Vec<Deal>,
    won: Vec<Deal>,
    lost: Vec<Deal>,
}

impl StageBuckets {
    pub fn get(&self, stage: DealStage) -> &[Deal] {
        match stage {
            DealStage::Open => &self.open,
            DealStage::Pending => &self.pending,
            DealStage::Won => &self.won,
            DealStage::Lost => &self.lost,
        }
    }

    fn get_mut(&mut self, stage: DealStage) -> &mut Vec<Deal> {
        match stage {
            DealStage::Open => &mut self.open,
            DealStage::Pending => &mut self.pending,
            DealStage::Won => &mut self.won,
            DealStage::Lost => &mut self.lost,
        }
    }

    /// Columns in board order: Open, Pending, Won, Lost
    pub fn iter(&self) -> impl Iterator<Item = (DealStage, &[Deal])> {
        DealStage::ALL
            .into_iter()
            .map(move |stage| (stage, self.get(stage)))
    }

    /// Number of deals across all columns
    pub fn total(&self) -> usize {
        self.iter().map(|(_, deals)| deals.len()).sum()
    }

    /// Sum of deal values in one column
    pub fn value(&self, stage: DealStage) -> f64 {
        self.get(stage).iter().map(|deal| deal.value).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Partition deals by stage, preserving input order within each column
pub fn group_by_stage<'a, I>(deals: I) -> StageBuckets
where
    I: IntoIterator<Item = &'a Deal>,
{
    let mut buckets = StageBuckets::default();
    for deal in deals {
        buckets.get_mut(deal.stage).push(deal.clone());
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::collections::HashSet;

    fn deal(id: &str, stage: DealStage, value: f64) -> Deal {
        Deal {
            id: id.to_string(),
            title: format!("Deal {}", id),
            value,
            stage,
            user_id: "u1".to_string(),
            customer_id: None,
            customer_name: None,
            closing_date: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Deterministic spread of stages, skewed so some columns stay empty
    fn generated(count: usize, stride: usize) -> Vec<Deal> {
        (0..count)
            .map(|i| {
                let stage = DealStage::ALL[(i * stride) % DealStage::ALL.len()];
                deal(&i.to_string(), stage, i as f64)
            })
            .collect()
    }

    #[rstest]
    #[case(0, 1)]
    #[case(1, 1)]
    #[case(7, 1)]
    #[case(16, 2)]
    #[case(33, 3)]
    #[case(50, 4)]
    fn test_buckets_partition_input(#[case] count: usize, #[case] stride: usize) {
        let deals = generated(count, stride);
        let buckets = group_by_stage(&deals);

        assert_eq!(buckets.total(), deals.len());

        let mut seen = HashSet::new();
        for (stage, column) in buckets.iter() {
            for deal in column {
                assert_eq!(deal.stage, stage);
                assert!(seen.insert(deal.id.clone()), "{} appears twice", deal.id);
            }
        }
        assert_eq!(seen.len(), deals.len());
    }

    #[test]
    fn test_columns_keep_input_order() {
        let deals = vec![
            deal("a", DealStage::Won, 1.0),
            deal("b", DealStage::Open, 2.0),
            deal("c", DealStage::Won, 3.0),
        ];
        let buckets = group_by_stage(&deals);

        let won: Vec<&str> = buckets
            .get(DealStage::Won)
            .iter()
            .map(|d| d.id.as_str())
            .collect();
        assert_eq!(won, vec!["a", "c"]);
        assert_eq!(buckets.value(DealStage::Won), 4.0);
        assert!(buckets.get(DealStage::Lost).is_empty());
    }

    #[test]
    fn test_iter_uses_board_order() {
        let stages: Vec<DealStage> = StageBuckets::default().iter().map(|(s, _)| s).collect();
        assert_eq!(stages, DealStage::ALL.to_vec());
    }
}

use tracing::trace;

use super::bucket::BucketDefinition;
use super::types::NotificationKind;

/// Kind-to-bucket lookup table.
///
/// Entries keep the bucket declaration order, and the first bucket that accepts a
/// kind the notification is assignable to wins. Overlapping declarations are
/// therefore resolved by order, not by specificity.
#[derive(Debug, Clone, Default)]
pub struct Router {
    table: Vec<(usize, Vec<NotificationKind>)>,
}

impl Router {
    pub fn new(definitions: &[BucketDefinition]) -> Self {
        let table = definitions
            .iter()
            .enumerate()
            .map(|(index, definition)| (index, definition.accepted_kinds.clone()))
            .collect();
        Self { table }
    }

    /// Index of the bucket that should own a notification of `kind`, or `None`
    /// if no bucket accepts it.
    pub fn route(&self, kind: &NotificationKind) -> Option<usize> {
        let found = self
            .table
            .iter()
            .find(|(_, accepted)| accepted.iter().any(|target| kind.is_assignable_to(target)))
            .map(|(index, _)| *index);
        trace!("Routed {:?} to bucket {:?}", kind, found);
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_by_declared_kind() {
        let router = Router::new(&BucketDefinition::default_layout());
        assert_eq!(router.route(&NotificationKind::Simple), Some(0));
        assert_eq!(router.route(&NotificationKind::Progress), Some(1));
    }

    #[test]
    fn subtypes_route_to_base_kind_bucket() {
        let router = Router::new(&BucketDefinition::default_layout());
        assert_eq!(router.route(&NotificationKind::ProgressCompletion), Some(0));
        let import = NotificationKind::custom_derived("import", NotificationKind::Progress);
        assert_eq!(router.route(&import), Some(1));
    }

    #[test]
    fn unknown_kind_is_unroutable() {
        let router = Router::new(&BucketDefinition::default_layout());
        assert_eq!(router.route(&NotificationKind::custom("telemetry")), None);
        assert_eq!(Router::default().route(&NotificationKind::Simple), None);
    }

    #[test]
    fn first_matching_bucket_wins_on_overlap() {
        let definitions = vec![
            BucketDefinition::new("Everything", "Clear All", vec![NotificationKind::Simple]),
            BucketDefinition::new("Results", "Clear All", vec![NotificationKind::ProgressCompletion]),
        ];
        let router = Router::new(&definitions);
        assert_eq!(router.route(&NotificationKind::ProgressCompletion), Some(0));
    }
}

//! Boundary between the scoring pipeline and a pre-trained binary classifier.
//!
//! The model is loaded once, wrapped in [`ClassifierAdapter`], and shared
//! read-only by every scoring request. The adapter owns schema fidelity: the
//! model must have been trained on exactly the columns the feature schema emits.

mod forest;

pub use forest::{DecisionTree, ForestModel, ModelLoadError, TreeNode};

use super::domain::Verdict;
use super::features::{FeatureSchema, FeatureVector};
use std::sync::Arc;

/// Capability exposed by any pre-trained buy/avoid model.
pub trait InvestmentClassifier: Send + Sync {
    /// Column order the model was trained on.
    fn feature_names(&self) -> &[String];

    /// Raw class label for one feature row.
    fn predict(&self, features: &[f64]) -> Result<u8, ClassifierError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassifierError {
    #[error("classifier expects columns [{}] but the feature schema emits [{}]", .expected.join(", "), .actual.join(", "))]
    SchemaMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },
    #[error("classifier expects {expected} features, received {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("classifier returned label {0}; only 0 and 1 are valid")]
    UnexpectedLabel(u8),
}

/// Maps feature vectors onto a shared model and its labels onto verdicts.
pub struct ClassifierAdapter<C: ?Sized> {
    model: Arc<C>,
    schema: Arc<FeatureSchema>,
}

impl<C> Clone for ClassifierAdapter<C>
where
    C: ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            model: Arc::clone(&self.model),
            schema: Arc::clone(&self.schema),
        }
    }
}

impl<C> ClassifierAdapter<C>
where
    C: InvestmentClassifier + ?Sized,
{
    /// Binds a model to a schema, failing fast when the training-time column
    /// layout differs from what the builder produces.
    pub fn new(model: Arc<C>, schema: Arc<FeatureSchema>) -> Result<Self, ClassifierError> {
        verify_schema(model.feature_names(), &schema)?;
        Ok(Self { model, schema })
    }

    pub fn schema(&self) -> &Arc<FeatureSchema> {
        &self.schema
    }

    pub fn predict(&self, features: &FeatureVector) -> Result<Verdict, ClassifierError> {
        let values = features.values();
        if values.len() != self.schema.len() {
            return Err(ClassifierError::LengthMismatch {
                expected: self.schema.len(),
                actual: values.len(),
            });
        }

        match self.model.predict(&values)? {
            1 => Ok(Verdict::GoodBuy),
            0 => Ok(Verdict::Avoid),
            other => Err(ClassifierError::UnexpectedLabel(other)),
        }
    }
}

fn verify_schema(expected: &[String], schema: &FeatureSchema) -> Result<(), ClassifierError> {
    if expected == schema.columns() {
        return Ok(());
    }

    Err(ClassifierError::SchemaMismatch {
        expected: expected.to_vec(),
        actual: schema.columns().to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::investment::domain::ListingAttributes;

    struct FixedLabel {
        names: Vec<String>,
        label: u8,
    }

    impl FixedLabel {
        fn for_schema(schema: &FeatureSchema, label: u8) -> Self {
            Self {
                names: schema.columns().to_vec(),
                label,
            }
        }
    }

    impl InvestmentClassifier for FixedLabel {
        fn feature_names(&self) -> &[String] {
            &self.names
        }

        fn predict(&self, _features: &[f64]) -> Result<u8, ClassifierError> {
            Ok(self.label)
        }
    }

    fn vector(schema: &FeatureSchema) -> FeatureVector {
        schema
            .build(&ListingAttributes::new(300_000.0, 3, 2.0, "33304"), 2700.0)
            .expect("vector builds")
    }

    #[test]
    fn maps_binary_labels_to_verdicts() {
        let schema = Arc::new(FeatureSchema::standard());
        let buy = ClassifierAdapter::new(Arc::new(FixedLabel::for_schema(&schema, 1)), schema.clone())
            .expect("schema matches");
        let avoid =
            ClassifierAdapter::new(Arc::new(FixedLabel::for_schema(&schema, 0)), schema.clone())
                .expect("schema matches");

        assert_eq!(buy.predict(&vector(&schema)), Ok(Verdict::GoodBuy));
        assert_eq!(avoid.predict(&vector(&schema)), Ok(Verdict::Avoid));
    }

    #[test]
    fn non_binary_label_is_fatal() {
        let schema = Arc::new(FeatureSchema::standard());
        let adapter =
            ClassifierAdapter::new(Arc::new(FixedLabel::for_schema(&schema, 2)), schema.clone())
                .expect("schema matches");

        assert_eq!(
            adapter.predict(&vector(&schema)),
            Err(ClassifierError::UnexpectedLabel(2))
        );
    }

    #[test]
    fn self_check_rejects_reordered_columns() {
        let schema = Arc::new(FeatureSchema::standard());
        let mut names = schema.columns().to_vec();
        names.swap(0, 1);
        let model = Arc::new(FixedLabel { names, label: 1 });

        let result = ClassifierAdapter::new(model, schema);
        assert!(matches!(result, Err(ClassifierError::SchemaMismatch { .. })));
    }

    #[test]
    fn self_check_rejects_missing_zip_columns() {
        let trained = FeatureSchema::new(["33304", "33305"]).expect("schema builds");
        let serving = Arc::new(FeatureSchema::standard());
        let model = Arc::new(FixedLabel::for_schema(&trained, 1));

        let error = ClassifierAdapter::new(model, serving)
            .err()
            .expect("mismatch detected");
        assert!(error.to_string().contains("zipcode_33316"));
    }

    #[test]
    fn vectors_from_a_foreign_schema_are_refused() {
        let schema = Arc::new(FeatureSchema::standard());
        let adapter =
            ClassifierAdapter::new(Arc::new(FixedLabel::for_schema(&schema, 1)), schema)
                .expect("schema matches");
        let foreign = FeatureSchema::new(["33304"]).expect("schema builds");

        assert_eq!(
            adapter.predict(&vector(&foreign)),
            Err(ClassifierError::LengthMismatch {
                expected: 13,
                actual: 5
            })
        );
    }

    #[test]
    fn adapter_accepts_trait_objects() {
        let schema = Arc::new(FeatureSchema::standard());
        let model: Arc<dyn InvestmentClassifier> = Arc::new(FixedLabel::for_schema(&schema, 1));
        let adapter = ClassifierAdapter::new(model, schema.clone()).expect("schema matches");

        assert_eq!(adapter.predict(&vector(&schema)), Ok(Verdict::GoodBuy));
    }
}

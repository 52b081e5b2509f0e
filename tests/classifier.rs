use anyhow::Result;
use auto_motion::classifier::{Classifier, ForestConfig, Learner, RandomForest};
use auto_motion::error::ClassifierError;

// Two well separated clusters over three channels.
fn separable(n: usize) -> (Vec<Vec<f64>>, Vec<u8>) {
    let mut x = Vec::with_capacity(n);
    let mut y = Vec::with_capacity(n);
    for i in 0..n {
        let jitter = (i % 7) as f64 * 0.01;
        if i % 4 == 0 {
            x.push(vec![5.0 + jitter, 4.0 - jitter, 6.0 + jitter]);
            y.push(1);
        } else {
            x.push(vec![jitter, -jitter, 0.5 * jitter]);
            y.push(0);
        }
    }
    (x, y)
}

fn small_forest() -> RandomForest {
    RandomForest::new(ForestConfig {
        n_trees: 15,
        seed: 7,
        ..ForestConfig::default()
    })
}

fn classifier_error(err: &anyhow::Error) -> Option<&ClassifierError> {
    err.downcast_ref::<ClassifierError>()
}

#[test]
fn predict_before_train_fails() {
    let clf = Classifier::new(small_forest());
    let err = clf.predict(&[vec![0.0, 0.0, 0.0]]).unwrap_err();
    assert!(matches!(classifier_error(&err), Some(ClassifierError::NotTrained)));
}

#[test]
fn predictions_are_binary_and_one_per_row() {
    let (x, y) = separable(40);
    let mut clf = Classifier::new(small_forest());
    clf.train(&x, &y).unwrap();
    assert!(clf.is_trained());

    let (test_x, test_y) = separable(12);
    let pred = clf.predict(&test_x).unwrap();
    assert_eq!(pred.len(), 12);
    assert!(pred.iter().all(|&p| p == 0 || p == 1));
    assert_eq!(pred, test_y);
    assert!(clf.predict(&[]).unwrap().is_empty());
}

#[test]
fn training_twice_fails() {
    let (x, y) = separable(8);
    let mut clf = Classifier::new(small_forest());
    clf.train(&x, &y).unwrap();
    let err = clf.train(&x, &y).unwrap_err();
    assert!(matches!(classifier_error(&err), Some(ClassifierError::AlreadyTrained)));
}

#[test]
fn empty_training_set_fails() {
    let mut clf = Classifier::new(small_forest());
    let err = clf.train(&[], &[]).unwrap_err();
    assert!(matches!(classifier_error(&err), Some(ClassifierError::EmptyTrainingSet)));
    assert!(!clf.is_trained());
}

#[test]
fn label_count_must_match_rows() {
    let (x, _) = separable(8);
    let mut clf = Classifier::new(small_forest());
    let err = clf.train(&x, &[0, 1]).unwrap_err();
    assert!(matches!(
        classifier_error(&err),
        Some(ClassifierError::LabelMismatch { rows: 8, labels: 2 })
    ));
}

#[test]
fn feature_width_must_match_training() {
    let (x, y) = separable(8);
    let mut clf = Classifier::new(small_forest());
    clf.train(&x, &y).unwrap();
    let err = clf.predict(&[vec![0.0, 1.0]]).unwrap_err();
    assert!(matches!(
        classifier_error(&err),
        Some(ClassifierError::FeatureMismatch { expected: 3, got: 2 })
    ));
}

#[test]
fn same_seed_same_predictions() {
    let (x, y) = separable(40);
    let probe: Vec<Vec<f64>> = (0..20).map(|i| vec![i as f64 * 0.3, 2.0, i as f64 * 0.25]).collect();

    let mut a = Classifier::new(small_forest());
    a.train(&x, &y).unwrap();
    let mut b = Classifier::new(small_forest());
    b.train(&x, &y).unwrap();
    assert_eq!(a.predict(&probe).unwrap(), b.predict(&probe).unwrap());
}

/// Flags rows whose first standardized channel is positive.
#[derive(Default)]
struct SignOfFirst {
    fitted: bool,
}

impl Learner for SignOfFirst {
    fn name(&self) -> &'static str {
        "sign_of_first"
    }

    fn fit(&mut self, _x: &[Vec<f64>], _y: &[u8]) -> Result<()> {
        self.fitted = true;
        Ok(())
    }

    fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<u8>> {
        assert!(self.fitted);
        Ok(x.iter().map(|r| u8::from(r[0] > 0.0)).collect())
    }
}

#[test]
fn scaling_is_frozen_at_training_time() {
    let mut clf = Classifier::new(SignOfFirst::default());
    clf.train(&[vec![0.0], vec![10.0]], &[0, 1]).unwrap();

    let scaler = clf.scaler().unwrap();
    assert_eq!(scaler.means(), &[5.0]);
    assert_eq!(scaler.scales(), &[5.0]);

    // A refit on these rows alone would centre them at zero.
    assert_eq!(clf.predict(&[vec![9.0]]).unwrap(), vec![1]);
    assert_eq!(clf.predict(&[vec![1.0]]).unwrap(), vec![0]);
}

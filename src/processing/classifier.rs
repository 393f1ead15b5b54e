//! Pre-trained classifiers mapping feature vectors to class indices

use crate::error::{Result, ResumeClassifierError};
use crate::processing::vectorizer::FeatureVector;
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub trait Classifier: Send + Sync {
    /// One score per class (or a single score for a binary model)
    fn decision_function(&self, features: &FeatureVector) -> Result<Array1<f64>>;

    /// Encoded class index for each score column
    fn classes(&self) -> &[usize];

    fn n_features(&self) -> usize;

    fn kind(&self) -> &'static str;

    fn predict(&self, features: &FeatureVector) -> Result<usize> {
        if features.len() != self.n_features() {
            return Err(ResumeClassifierError::ModelInference(format!(
                "{} classifier expects {} features, got {}",
                self.kind(),
                self.n_features(),
                features.len()
            )));
        }

        let scores = self.decision_function(features)?;
        if scores.iter().any(|s| !s.is_finite()) {
            return Err(ResumeClassifierError::ModelInference(format!(
                "{} classifier produced non-finite decision values",
                self.kind()
            )));
        }

        let classes = self.classes();
        let column = if scores.len() == 1 && classes.len() == 2 {
            usize::from(scores[0] > 0.0)
        } else {
            argmax(scores.view()).ok_or_else(|| {
                ResumeClassifierError::ModelInference(format!("{} classifier produced no scores", self.kind()))
            })?
        };

        classes.get(column).copied().ok_or_else(|| {
            ResumeClassifierError::ModelInference(format!(
                "score column {} has no class ({} classes)",
                column,
                classes.len()
            ))
        })
    }
}

/// First index of the maximum value
fn argmax(values: ArrayView1<'_, f64>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    Linear {
        classes: Vec<usize>,
        coef: Vec<Vec<f64>>,
        intercept: Vec<f64>,
    },
    OneVsRestSvc {
        classes: Vec<usize>,
        estimators: Vec<SvcEstimatorArtifact>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SvcEstimatorArtifact {
    pub support_vectors: Vec<Vec<f64>>,
    pub dual_coef: Vec<f64>,
    pub intercept: f64,
    pub kernel: Kernel,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Kernel {
    Linear,
    Rbf {
        gamma: f64,
    },
    Poly {
        gamma: f64,
        #[serde(default)]
        coef0: f64,
        #[serde(default = "default_degree")]
        degree: i32,
    },
    Sigmoid {
        gamma: f64,
        #[serde(default)]
        coef0: f64,
    },
}

fn default_degree() -> i32 {
    3
}

impl Kernel {
    pub fn apply(&self, a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
        match *self {
            Kernel::Linear => a.dot(&b),
            Kernel::Rbf { gamma } => {
                let squared: f64 = a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum();
                (-gamma * squared).exp()
            }
            Kernel::Poly { gamma, coef0, degree } => (gamma * a.dot(&b) + coef0).powi(degree),
            Kernel::Sigmoid { gamma, coef0 } => (gamma * a.dot(&b) + coef0).tanh(),
        }
    }
}

fn matrix(rows: Vec<Vec<f64>>, what: &str) -> Result<Array2<f64>> {
    let n_rows = rows.len();
    let n_cols = rows.first().map(Vec::len).unwrap_or(0);
    if n_rows == 0 || n_cols == 0 {
        return Err(ResumeClassifierError::ModelLoading(format!("{} is empty", what)));
    }
    if rows.iter().any(|r| r.len() != n_cols) {
        return Err(ResumeClassifierError::ModelLoading(format!("{} has ragged rows", what)));
    }

    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Ok(Array2::from_shape_vec((n_rows, n_cols), flat)?)
}

fn check_score_columns(columns: usize, classes: &[usize], what: &str) -> Result<()> {
    let binary = columns == 1 && classes.len() == 2;
    if columns != classes.len() && !binary {
        return Err(ResumeClassifierError::ModelLoading(format!(
            "{} has {} score columns for {} classes",
            what,
            columns,
            classes.len()
        )));
    }
    Ok(())
}

/// Linear decision function `coef · x + intercept` (LinearSVC, logistic regression).
#[derive(Debug, Clone)]
pub struct LinearClassifier {
    classes: Vec<usize>,
    coef: Array2<f64>,
    intercept: Array1<f64>,
}

impl LinearClassifier {
    pub fn new(classes: Vec<usize>, coef: Array2<f64>, intercept: Array1<f64>) -> Result<Self> {
        if coef.nrows() != intercept.len() {
            return Err(ResumeClassifierError::ModelLoading(format!(
                "linear classifier has {} coefficient rows but {} intercepts",
                coef.nrows(),
                intercept.len()
            )));
        }
        check_score_columns(coef.nrows(), &classes, "linear classifier")?;

        Ok(Self {
            classes,
            coef,
            intercept,
        })
    }
}

impl Classifier for LinearClassifier {
    fn decision_function(&self, features: &FeatureVector) -> Result<Array1<f64>> {
        Ok(self.coef.dot(features) + &self.intercept)
    }

    fn classes(&self) -> &[usize] {
        &self.classes
    }

    fn n_features(&self) -> usize {
        self.coef.ncols()
    }

    fn kind(&self) -> &'static str {
        "linear"
    }
}

/// One binary kernel SVM, decision `Σ dual_coef_i · K(sv_i, x) + intercept`.
#[derive(Debug, Clone)]
pub struct SvcEstimator {
    support_vectors: Array2<f64>,
    dual_coef: Array1<f64>,
    intercept: f64,
    kernel: Kernel,
}

impl SvcEstimator {
    pub fn new(support_vectors: Array2<f64>, dual_coef: Array1<f64>, intercept: f64, kernel: Kernel) -> Result<Self> {
        if support_vectors.nrows() != dual_coef.len() {
            return Err(ResumeClassifierError::ModelLoading(format!(
                "SVC estimator has {} support vectors but {} dual coefficients",
                support_vectors.nrows(),
                dual_coef.len()
            )));
        }
        Ok(Self {
            support_vectors,
            dual_coef,
            intercept,
            kernel,
        })
    }

    fn from_artifact(artifact: SvcEstimatorArtifact) -> Result<Self> {
        let support_vectors = matrix(artifact.support_vectors, "SVC support vectors")?;
        Self::new(support_vectors, Array1::from(artifact.dual_coef), artifact.intercept, artifact.kernel)
    }

    pub fn n_features(&self) -> usize {
        self.support_vectors.ncols()
    }

    pub fn decision(&self, features: &FeatureVector) -> f64 {
        let x = features.view();
        self.support_vectors
            .rows()
            .into_iter()
            .zip(self.dual_coef.iter())
            .map(|(sv, alpha)| alpha * self.kernel.apply(sv, x))
            .sum::<f64>()
            + self.intercept
    }
}

/// One-vs-rest ensemble of binary SVCs; the highest decision wins.
#[derive(Debug, Clone)]
pub struct OneVsRestSvc {
    classes: Vec<usize>,
    estimators: Vec<SvcEstimator>,
}

impl OneVsRestSvc {
    pub fn new(classes: Vec<usize>, estimators: Vec<SvcEstimator>) -> Result<Self> {
        let n_features = estimators
            .first()
            .map(SvcEstimator::n_features)
            .ok_or_else(|| ResumeClassifierError::ModelLoading("one-vs-rest SVC has no estimators".to_string()))?;

        if estimators.iter().any(|e| e.n_features() != n_features) {
            return Err(ResumeClassifierError::ModelLoading(
                "one-vs-rest SVC estimators disagree on feature count".to_string(),
            ));
        }
        check_score_columns(estimators.len(), &classes, "one-vs-rest SVC")?;

        Ok(Self { classes, estimators })
    }
}

impl Classifier for OneVsRestSvc {
    fn decision_function(&self, features: &FeatureVector) -> Result<Array1<f64>> {
        Ok(self.estimators.iter().map(|e| e.decision(features)).collect())
    }

    fn classes(&self) -> &[usize] {
        &self.classes
    }

    fn n_features(&self) -> usize {
        self.estimators.first().map(SvcEstimator::n_features).unwrap_or(0)
    }

    fn kind(&self) -> &'static str {
        "one_vs_rest_svc"
    }
}

pub fn classifier_from_artifact(artifact: ClassifierArtifact) -> Result<Box<dyn Classifier>> {
    match artifact {
        ClassifierArtifact::Linear {
            classes,
            coef,
            intercept,
        } => {
            let coef = matrix(coef, "linear coefficients")?;
            Ok(Box::new(LinearClassifier::new(classes, coef, Array1::from(intercept))?))
        }
        ClassifierArtifact::OneVsRestSvc { classes, estimators } => {
            let estimators = estimators
                .into_iter()
                .map(SvcEstimator::from_artifact)
                .collect::<Result<Vec<_>>>()?;
            Ok(Box::new(OneVsRestSvc::new(classes, estimators)?))
        }
    }
}

pub fn classifier_from_file(path: &Path) -> Result<Box<dyn Classifier>> {
    let json = std::fs::read_to_string(path).map_err(|e| {
        ResumeClassifierError::ModelLoading(format!("cannot read classifier {}: {}", path.display(), e))
    })?;
    let artifact: ClassifierArtifact = serde_json::from_str(&json)
        .map_err(|e| ResumeClassifierError::ModelLoading(format!("malformed classifier artifact: {}", e)))?;
    classifier_from_artifact(artifact)
}

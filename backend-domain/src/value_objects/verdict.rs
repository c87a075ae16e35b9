// Outlier verdict value object
// Serialized as the model label: -1 for outliers, 1 for inliers.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Outlier,
    Inlier,
}

impl Verdict {
    pub fn from_decision(decision: f64) -> Self {
        if decision < 0.0 {
            Verdict::Outlier
        } else {
            Verdict::Inlier
        }
    }

    pub fn label(&self) -> i8 {
        match self {
            Verdict::Outlier => -1,
            Verdict::Inlier => 1,
        }
    }
}

impl Serialize for Verdict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i8(self.label())
    }
}

impl<'de> Deserialize<'de> for Verdict {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match i8::deserialize(deserializer)? {
            -1 => Ok(Verdict::Outlier),
            1 => Ok(Verdict::Inlier),
            other => Err(serde::de::Error::custom(format!(
                "anomaly label must be -1 or 1, got {other}"
            ))),
        }
    }
}

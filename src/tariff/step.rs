use crate::error::RegistryError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Strict comparison used by `apply_conditional_value`.
///
/// There is deliberately no `gte`/`lte`: inclusive checks have to be written
/// with one of these three (e.g. `floor > 1` instead of `floor >= 2`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    Gt,
    Lt,
    Eq,
}

impl Comparison {
    /// Returns whether `value <op> threshold` holds.
    pub fn holds(self, value: f64, threshold: f64) -> bool {
        match self {
            Comparison::Gt => value > threshold,
            Comparison::Lt => value < threshold,
            Comparison::Eq => value == threshold,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Comparison::Gt => "gt",
            Comparison::Lt => "lt",
            Comparison::Eq => "eq",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Comparison::Gt => ">",
            Comparison::Lt => "<",
            Comparison::Eq => "==",
        }
    }
}

impl FromStr for Comparison {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gt" => Ok(Comparison::Gt),
            "lt" => Ok(Comparison::Lt),
            "eq" => Ok(Comparison::Eq),
            other => Err(RegistryError::InvalidCondition(other.to_string())),
        }
    }
}

/// A single operation in a tariff pipeline.
///
/// Every step reads or rewrites the pipeline's running accumulator. Steps that
/// name a key read it from the rule's own `params`, except `GetParam`,
/// `MultiplyByContext` and the check side of `ApplyConditionalValue`, which
/// read the per-request calculation context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawStep", into = "RawStep")]
pub enum Step {
    /// accumulator := volumes[source]
    GetVolume { source: String },
    /// accumulator := context[key]
    GetParam { key: String },
    /// accumulator := params[key]
    GetFixedAmount { key: String },
    /// accumulator *= params[key]
    MultiplyByParam { key: String },
    /// accumulator += params[key]
    AddParam { key: String },
    /// accumulator *= context[key]
    MultiplyByContext { key: String },
    /// accumulator := tiered cost of the accumulator (a volume) over params[brackets_key]
    ApplyProgressiveRate { brackets_key: String },
    /// accumulator *= blend of the subsidised and full rates by the subsidy multiplier
    ApplySubsidy {
        subsidy_key: String,
        full_key: String,
    },
    /// accumulator *= 1 + vat
    ApplyVat,
    /// accumulator := params[if_true] or params[if_false], chosen by context[check_param] <op> threshold
    ApplyConditionalValue {
        check_param: String,
        condition: Comparison,
        threshold: f64,
        if_true: String,
        if_false: String,
    },
    /// accumulator := sum of each sub-pipeline, each started from zero
    SumOfSteps { pipelines: Vec<Vec<Step>> },
    /// An operator this version does not know. Executed as a no-op; its other
    /// fields are kept verbatim so saving the configuration loses nothing.
    Unknown {
        operator: String,
        fields: Map<String, Value>,
    },
}

impl Step {
    /// An unknown operator without any extra fields.
    pub fn unknown(operator: impl Into<String>) -> Self {
        Step::Unknown {
            operator: operator.into(),
            fields: Map::new(),
        }
    }

    /// The operator tag used in configuration data.
    pub fn operator_name(&self) -> &str {
        match self {
            Step::GetVolume { .. } => "get_volume",
            Step::GetParam { .. } => "get_param",
            Step::GetFixedAmount { .. } => "get_fixed_amount",
            Step::MultiplyByParam { .. } => "multiply_by_param",
            Step::AddParam { .. } => "add_param",
            Step::MultiplyByContext { .. } => "multiply_by_context",
            Step::ApplyProgressiveRate { .. } => "apply_progressive_rate",
            Step::ApplySubsidy { .. } => "apply_subsidy",
            Step::ApplyVat => "apply_vat",
            Step::ApplyConditionalValue { .. } => "apply_conditional_value",
            Step::SumOfSteps { .. } => "sum_of_steps",
            Step::Unknown { operator, .. } => operator,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::GetVolume { source } => write!(f, "get_volume({})", source),
            Step::GetParam { key } => write!(f, "get_param(${})", key),
            Step::GetFixedAmount { key }
            | Step::MultiplyByParam { key }
            | Step::AddParam { key } => write!(f, "{}({})", self.operator_name(), key),
            Step::MultiplyByContext { key } => write!(f, "multiply_by_context(${})", key),
            Step::ApplyProgressiveRate { brackets_key } => {
                write!(f, "apply_progressive_rate({})", brackets_key)
            }
            Step::ApplySubsidy {
                subsidy_key,
                full_key,
            } => write!(f, "apply_subsidy({}, {})", subsidy_key, full_key),
            Step::ApplyVat => write!(f, "apply_vat()"),
            Step::ApplyConditionalValue {
                check_param,
                condition,
                threshold,
                if_true,
                if_false,
            } => write!(
                f,
                "apply_conditional_value(${} {} {} ? {} : {})",
                check_param,
                condition.symbol(),
                threshold,
                if_true,
                if_false
            ),
            Step::SumOfSteps { pipelines } => {
                write!(f, "sum_of_steps({} pipelines)", pipelines.len())
            }
            Step::Unknown { operator, .. } => write!(f, "{}(?)", operator),
        }
    }
}

/// The storage shape of a step: a tagged object `{operator, ...fields}`.
///
/// Every operator-specific field is optional here; `Step::try_from` checks that
/// a known operator carries the fields it needs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawStep {
    pub operator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params_keys: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_param: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_if_true: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_if_false: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipelines: Option<Vec<Vec<Step>>>,
    /// Fields no known operator uses.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn require<T>(value: Option<T>, operator: &str, field: &'static str) -> Result<T, RegistryError> {
    value.ok_or_else(|| RegistryError::MalformedStep {
        operator: operator.to_string(),
        field,
    })
}

impl TryFrom<RawStep> for Step {
    type Error = RegistryError;

    fn try_from(raw: RawStep) -> Result<Self, Self::Error> {
        let op = raw.operator.as_str();
        let step = match op {
            "get_volume" => Step::GetVolume {
                source: require(raw.source, op, "source")?,
            },
            "get_param" => Step::GetParam {
                key: require(raw.param_key, op, "param_key")?,
            },
            "get_fixed_amount" => Step::GetFixedAmount {
                key: require(raw.param_key, op, "param_key")?,
            },
            "multiply_by_param" => Step::MultiplyByParam {
                key: require(raw.param_key, op, "param_key")?,
            },
            "add_param" => Step::AddParam {
                key: require(raw.param_key, op, "param_key")?,
            },
            "multiply_by_context" => Step::MultiplyByContext {
                key: require(raw.param_key, op, "param_key")?,
            },
            "apply_progressive_rate" => Step::ApplyProgressiveRate {
                brackets_key: require(raw.param_key, op, "param_key")?,
            },
            "apply_subsidy" | "apply_subsidy_rate" => {
                let keys = require(raw.params_keys, op, "params_keys")?;
                let [subsidy_key, full_key]: [String; 2] =
                    keys.try_into().map_err(|_| RegistryError::MalformedStep {
                        operator: op.to_string(),
                        field: "params_keys",
                    })?;
                Step::ApplySubsidy {
                    subsidy_key,
                    full_key,
                }
            }
            "apply_vat" => Step::ApplyVat,
            "apply_conditional_value" => Step::ApplyConditionalValue {
                check_param: require(raw.check_param, op, "check_param")?,
                condition: require(raw.condition, op, "condition")?.parse()?,
                threshold: require(raw.threshold, op, "threshold")?,
                if_true: require(raw.value_if_true, op, "value_if_true")?,
                if_false: require(raw.value_if_false, op, "value_if_false")?,
            },
            "sum_of_steps" => Step::SumOfSteps {
                pipelines: require(raw.pipelines, op, "pipelines")?,
            },
            _ => {
                let mut fields = match serde_json::to_value(&raw) {
                    Ok(Value::Object(fields)) => fields,
                    Ok(_) => Map::new(),
                    Err(e) => return Err(RegistryError::JsonParseError(e.to_string())),
                };
                fields.remove("operator");
                Step::Unknown {
                    operator: raw.operator,
                    fields,
                }
            }
        };
        Ok(step)
    }
}

impl From<Step> for RawStep {
    fn from(step: Step) -> Self {
        let operator = step.operator_name().to_string();
        let mut raw = RawStep {
            operator,
            ..RawStep::default()
        };
        match step {
            Step::GetVolume { source } => raw.source = Some(source),
            Step::GetParam { key }
            | Step::GetFixedAmount { key }
            | Step::MultiplyByParam { key }
            | Step::AddParam { key }
            | Step::MultiplyByContext { key }
            | Step::ApplyProgressiveRate { brackets_key: key } => raw.param_key = Some(key),
            Step::ApplySubsidy {
                subsidy_key,
                full_key,
            } => raw.params_keys = Some(vec![subsidy_key, full_key]),
            Step::ApplyConditionalValue {
                check_param,
                condition,
                threshold,
                if_true,
                if_false,
            } => {
                raw.check_param = Some(check_param);
                raw.condition = Some(condition.as_str().to_string());
                raw.threshold = Some(threshold);
                raw.value_if_true = Some(if_true);
                raw.value_if_false = Some(if_false);
            }
            Step::SumOfSteps { pipelines } => raw.pipelines = Some(pipelines),
            Step::Unknown { fields, .. } => raw.extra = fields,
            Step::ApplyVat => {}
        }
        raw
    }
}

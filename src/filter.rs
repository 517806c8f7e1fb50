//! Query parameter to SQL condition translation.
//!
//! Raw query pairs are matched against a resource's filter-descriptor list
//! and combined into a single `AND` condition. Parameters that match no
//! descriptor (pagination, projection, typos) are ignored, as are values
//! that fail to parse for their declared kind.

use sea_orm::{ColumnTrait, Condition};

use crate::models::{FilterDescriptor, FilterKind};

/// Build a Sea-ORM condition from decoded query pairs.
///
/// Supported shapes, per [`FilterKind`]:
/// - `BooleanExact`: `field=true|false|1|0`
/// - `PartialMatch`: `field=substring` (SQL `LIKE %substring%`)
/// - `Range`: `field[gte]=n` and/or `field[lte]=n`, both inclusive
pub fn apply_filters<C: ColumnTrait>(
    params: &[(String, String)],
    descriptors: &[FilterDescriptor<C>],
) -> Condition {
    let mut condition = Condition::all();

    for (key, value) in params {
        for descriptor in descriptors {
            match descriptor.kind {
                FilterKind::BooleanExact => {
                    if key.as_str() == descriptor.field {
                        if let Some(flag) = parse_bool(value) {
                            condition = condition.add(descriptor.column.eq(flag));
                        }
                    }
                }
                FilterKind::PartialMatch => {
                    if key.as_str() == descriptor.field && !value.is_empty() {
                        condition = condition.add(descriptor.column.contains(value.as_str()));
                    }
                }
                FilterKind::Range => {
                    if key.as_str() == format!("{}[gte]", descriptor.field) {
                        if let Ok(bound) = value.parse::<i64>() {
                            condition = condition.add(descriptor.column.gte(bound));
                        }
                    } else if key.as_str() == format!("{}[lte]", descriptor.field) {
                        if let Ok(bound) = value.parse::<i64>() {
                            condition = condition.add(descriptor.column.lte(bound));
                        }
                    }
                }
            }
        }
    }

    condition
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

//! Life-area dimensions and their aspects.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AspectId, DimensionId, ValidationError};

/// The fixed fifteen-dimension taxonomy, in seeding order (ids 1..=15).
pub const STANDARD_DIMENSIONS: &[&str] = &[
    "Values",
    "Work Style",
    "Relationships",
    "Learning",
    "Decision Making",
    "Time Management",
    "Creativity",
    "Risk Tolerance",
    "Communication",
    "Physical Environment",
    "Mental State",
    "Financial",
    "Social",
    "Health",
    "Spirituality/Purpose",
];

/// Size of the standard taxonomy; breadth measures are normalised against it.
pub const TAXONOMY_SIZE: usize = 15;

/// Well-known dimension ids used by generated questions.
pub mod well_known {
    use crate::domain::foundation::DimensionId;

    pub const VALUES: DimensionId = DimensionId::new(1);
    pub const WORK_STYLE: DimensionId = DimensionId::new(2);
    pub const RELATIONSHIPS: DimensionId = DimensionId::new(3);
    pub const TIME_MANAGEMENT: DimensionId = DimensionId::new(6);
    pub const SOCIAL: DimensionId = DimensionId::new(13);
}

/// A top-level life-area category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    pub id: DimensionId,
    pub name: String,
}

impl Dimension {
    pub fn new(id: DimensionId, name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("dimension.name"));
        }
        Ok(Self { id, name })
    }

    /// Builds the standard taxonomy with sequential ids starting at 1.
    pub fn standard_set() -> Vec<Dimension> {
        STANDARD_DIMENSIONS
            .iter()
            .enumerate()
            .map(|(idx, name)| Dimension {
                id: DimensionId::new(idx as i64 + 1),
                name: (*name).to_string(),
            })
            .collect()
    }
}

/// A named sub-facet of a dimension (e.g. "freedom" under "Values").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aspect {
    pub id: AspectId,
    pub dimension_id: DimensionId,
    pub name: String,
}

impl Aspect {
    pub fn new(
        id: AspectId,
        dimension_id: DimensionId,
        name: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("aspect.name"));
        }
        Ok(Self {
            id,
            dimension_id,
            name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_set_has_fifteen_sequential_dimensions() {
        let dims = Dimension::standard_set();
        assert_eq!(dims.len(), TAXONOMY_SIZE);
        assert_eq!(dims[0].id, DimensionId::new(1));
        assert_eq!(dims[0].name, "Values");
        assert_eq!(dims[14].id, DimensionId::new(15));
        assert_eq!(dims[14].name, "Spirituality/Purpose");
    }

    #[test]
    fn well_known_ids_match_standard_names() {
        let dims = Dimension::standard_set();
        let name_of = |id: DimensionId| {
            dims.iter()
                .find(|d| d.id == id)
                .map(|d| d.name.as_str())
                .unwrap()
        };
        assert_eq!(name_of(well_known::WORK_STYLE), "Work Style");
        assert_eq!(name_of(well_known::TIME_MANAGEMENT), "Time Management");
        assert_eq!(name_of(well_known::SOCIAL), "Social");
    }

    #[test]
    fn dimension_rejects_blank_name() {
        assert!(Dimension::new(DimensionId::new(1), "  ").is_err());
    }

    #[test]
    fn aspect_keeps_parent_dimension() {
        let aspect = Aspect::new(AspectId::new(1), DimensionId::new(1), "freedom").unwrap();
        assert_eq!(aspect.dimension_id, DimensionId::new(1));
    }
}

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use crate::error::ModelError;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub Uuid);

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            pub fn to_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl AsRef<Uuid> for $name {
            fn as_ref(&self) -> &Uuid {
                &self.0
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if s.is_empty() {
                    return Err(ModelError::InvalidValue(format!(
                        "{} cannot be empty",
                        $label
                    )));
                }
                s.parse::<Uuid>().map(Self).map_err(|err| {
                    ModelError::InvalidValue(format!("invalid {} '{s}': {err}", $label))
                })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Identifies one artwork slot (an [`crate::ArtworkRequest`]).
    ArtworkId,
    "artwork id"
);
define_id!(
    /// Identifies a persisted [`crate::LocatedCandidate`] row.
    LocatedId,
    "located artwork id"
);
define_id!(MovieId, "movie id");
define_id!(SeriesId, "series id");
define_id!(SeasonId, "season id");
define_id!(EpisodeId, "episode id");
define_id!(BoxedSetId, "boxed set id");
define_id!(PersonId, "person id");
define_id!(
    /// Identifies a file known to the stage (import) layer.
    StageFileId,
    "stage file id"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_round_trip_and_rejects_empty() {
        let id = ArtworkId::new();
        let parsed: ArtworkId = id.to_string().parse().expect("valid uuid");
        assert_eq!(parsed, id);

        assert!("".parse::<ArtworkId>().is_err());
        assert!("not-a-uuid".parse::<PersonId>().is_err());
    }
}

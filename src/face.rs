//! The face descriptor module
//! A face is three bounded integer levels plus the id storage gave it

use crate::error::{FaceFinderError, Result};
use serde::Deserialize;

pub const RACE_MAX: i64 = 100;
pub const EMOTION_MAX: i64 = 1000;
pub const OLDNESS_MAX: i64 = 1000;

/// An immutable face descriptor.
///
/// `id == 0` means the face has not been stored yet. Storage assigns ids
/// starting from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    id: u64,
    race: u32,
    emotion: u32,
    oldness: u32,
}

/// Unchecked wire shape of a face, e.g. a JSON request body.
///
/// Turn it into a [`Face`] with `Face::try_from` to get the range checks.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct FaceRecord {
    pub race: i64,
    pub emotion: i64,
    pub oldness: i64,
    #[serde(default)]
    pub id: u64,
}

impl TryFrom<FaceRecord> for Face {
    type Error = FaceFinderError;

    fn try_from(record: FaceRecord) -> Result<Self> {
        Face::with_id(record.race, record.emotion, record.oldness, record.id)
    }
}

impl Face {
    /// Creates a new, not yet stored face.
    ///
    /// # Examples
    ///
    /// ```
    /// use facefinder::Face;
    ///
    /// let face = Face::new(1, 200, 500).unwrap();
    /// assert_eq!(face.id(), 0);
    /// assert!(Face::new(101, 200, 500).is_err());
    /// ```
    pub fn new(race: i64, emotion: i64, oldness: i64) -> Result<Face> {
        Face::with_id(race, emotion, oldness, 0)
    }

    /// Creates a face carrying a known id. The id itself is not validated.
    pub fn with_id(race: i64, emotion: i64, oldness: i64, id: u64) -> Result<Face> {
        let race = check_range("Race", race, RACE_MAX)?;
        let emotion = check_range("Emotion", emotion, EMOTION_MAX)?;
        let oldness = check_range("Oldness", oldness, OLDNESS_MAX)?;

        Ok(Face { id, race, emotion, oldness })
    }

    /// Returns the face id, or 0 if the face is new
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Race level, from 0 to 100
    pub fn race(&self) -> u32 {
        self.race
    }

    /// Emotion level, from 0 to 1000
    pub fn emotion(&self) -> u32 {
        self.emotion
    }

    /// Oldness level, from 0 to 1000
    pub fn oldness(&self) -> u32 {
        self.oldness
    }

    pub fn is_new(&self) -> bool {
        self.id == 0
    }

    /// Same levels, different id. Used once storage hands back an id.
    pub(crate) fn stored_as(&self, id: u64) -> Face {
        Face { id, ..*self }
    }
}

fn check_range(parameter: &'static str, value: i64, max: i64) -> Result<u32> {
    if !(0..=max).contains(&value) {
        return Err(FaceFinderError::OutOfRange { parameter, value, min: 0, max });
    }

    Ok(value as u32)
}

#[cfg(test)]
mod face_test {
    use super::*;

    #[test]
    fn test_new_face_keeps_values() {
        let face = Face::new(1, 200, 500).unwrap();

        assert_eq!(face.id(), 0);
        assert_eq!(face.race(), 1);
        assert_eq!(face.emotion(), 200);
        assert_eq!(face.oldness(), 500);
        assert!(face.is_new());
    }

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(Face::new(0, 0, 0).is_ok());
        assert!(Face::new(100, 1000, 1000).is_ok());
    }

    #[test]
    fn test_race_out_of_range() {
        for race in [-1, 101] {
            let err = Face::new(race, 0, 0).unwrap_err();
            assert!(err.is_validation());
        }
    }

    #[test]
    fn test_emotion_and_oldness_out_of_range() {
        assert!(Face::new(0, 1001, 0).unwrap_err().is_validation());
        assert!(Face::new(0, -5, 0).unwrap_err().is_validation());
        assert!(Face::new(0, 0, 1001).unwrap_err().is_validation());
    }

    #[test]
    fn test_error_message_names_parameter() {
        let err = Face::new(101, 0, 0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parameter `Race` out of range (101), allowed min: 0, max: 100"
        );
    }

    #[test]
    fn test_id_is_not_validated() {
        let face = Face::with_id(55, 100, 999, u64::MAX).unwrap();
        assert_eq!(face.id(), u64::MAX);
        assert!(!face.is_new());
    }

    #[test]
    fn test_stored_as_keeps_levels() {
        let face = Face::new(55, 100, 999).unwrap();
        let stored = face.stored_as(2);

        assert_eq!(stored.id(), 2);
        assert_eq!((stored.race(), stored.emotion(), stored.oldness()), (55, 100, 999));
    }

    #[test]
    fn test_record_defaults_id_and_validates() {
        let record: FaceRecord = serde_json::from_str(r#"{"race": 3, "emotion": 4, "oldness": 5}"#).unwrap();
        let face = Face::try_from(record).unwrap();
        assert_eq!(face.id(), 0);

        let record: FaceRecord = serde_json::from_str(r#"{"race": 300, "emotion": 4, "oldness": 5}"#).unwrap();
        assert!(Face::try_from(record).unwrap_err().is_validation());
    }
}

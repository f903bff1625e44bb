use crate::error::{ThumbsmithError, ThumbsmithResult};

/// One sticker placement within the sticker area.
///
/// `x`/`y` are percentages of the sticker area's width/height and give the
/// layer's *top-left* anchor before rotation, not its center. `order`
/// establishes paint order: ascending means painted first, bottom-most.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct LayoutRecord {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub size_px: u32,
    pub rotation_deg: f64,
    /// Key understood by the caller's [`AssetResolver`](crate::AssetResolver).
    pub sticker: String,
    pub order: i32,
}

impl LayoutRecord {
    /// Caller-facing guard for records coming off the wire or out of a store.
    ///
    /// The render pipeline itself never calls this: it tolerates anything
    /// (off-area placements clip, degenerate sizes skip), the same way the
    /// browser preview tolerates a shape dragged off the card.
    pub fn validate(&self) -> ThumbsmithResult<()> {
        if self.size_px == 0 {
            return Err(ThumbsmithError::validation(format!(
                "layout '{}' has size_px == 0",
                self.id
            )));
        }
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(ThumbsmithError::validation(format!(
                "layout '{}' has non-finite position",
                self.id
            )));
        }
        if !(0.0..=100.0).contains(&self.x) || !(0.0..=100.0).contains(&self.y) {
            return Err(ThumbsmithError::validation(format!(
                "layout '{}' position must be within 0..=100 percent",
                self.id
            )));
        }
        if !self.rotation_deg.is_finite() {
            return Err(ThumbsmithError::validation(format!(
                "layout '{}' has non-finite rotation",
                self.id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic_record() -> LayoutRecord {
        LayoutRecord {
            id: "l0".to_string(),
            x: 25.0,
            y: 40.0,
            size_px: 96,
            rotation_deg: 15.0,
            sticker: "cat".to_string(),
            order: 0,
        }
    }

    #[test]
    fn json_roundtrip() {
        let rec = basic_record();
        let s = serde_json::to_string_pretty(&rec).unwrap();
        let de: LayoutRecord = serde_json::from_str(&s).unwrap();
        assert_eq!(de.id, "l0");
        assert_eq!(de.size_px, 96);
        assert_eq!(de.sticker, "cat");
    }

    #[test]
    fn validate_accepts_basic_record() {
        basic_record().validate().unwrap();
    }

    #[test]
    fn validate_rejects_zero_size() {
        let mut rec = basic_record();
        rec.size_px = 0;
        assert!(rec.validate().is_err());
    }

    #[test]
    fn validate_rejects_out_of_range_percent() {
        let mut rec = basic_record();
        rec.x = 120.0;
        assert!(rec.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_finite_rotation() {
        let mut rec = basic_record();
        rec.rotation_deg = f64::NAN;
        assert!(rec.validate().is_err());
    }
}

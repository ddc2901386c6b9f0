use crate::error::ValidationError;

/// Discord exposes `image1`..`image5` on `/meal`.
pub const MAX_IMAGES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Webp,
}

impl ImageFormat {
    /// Match on the lowercased filename suffix; `None` for anything else.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let lower = filename.to_lowercase();
        if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
            Some(ImageFormat::Jpeg)
        } else if lower.ends_with(".png") {
            Some(ImageFormat::Png)
        } else if lower.ends_with(".webp") {
            Some(ImageFormat::Webp)
        } else {
            None
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Webp => "image/webp",
        }
    }
}

/// A Discord attachment as far as the meal pipeline cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub url: String,
    pub filename: String,
}

impl ImageAttachment {
    pub fn new(url: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            filename: filename.into(),
        }
    }

    pub fn format(&self) -> Option<ImageFormat> {
        ImageFormat::from_filename(&self.filename)
    }

    /// Validation already restricts extensions, so the JPEG default only
    /// covers attachments that never went through it.
    pub fn mime_type(&self) -> &'static str {
        self.format()
            .map(|f| f.mime_type())
            .unwrap_or("image/jpeg")
    }
}

/// Arguments of one `/meal` invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MealRequest {
    pub description: Option<String>,
    pub images: Vec<ImageAttachment>,
}

impl MealRequest {
    pub fn new(description: Option<String>, images: Vec<ImageAttachment>) -> Self {
        // Discord can send an empty string for a cleared option
        let description = description.filter(|d| !d.is_empty());
        Self {
            description,
            images,
        }
    }

    /// Checks run in order and stop at the first problem.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.description.is_none() && self.images.is_empty() {
            return Err(ValidationError::MissingInput);
        }

        if self.images.len() > MAX_IMAGES {
            return Err(ValidationError::TooManyImages {
                count: self.images.len(),
                max: MAX_IMAGES,
            });
        }

        if let Some(bad) = self.images.iter().find(|img| img.format().is_none()) {
            return Err(ValidationError::UnsupportedFormat {
                filename: bad.filename.clone(),
            });
        }

        Ok(())
    }
}

/// One unit of a multimodal model request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentBlock {
    Text { text: String },
    Image { mime_type: String, data: String },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    pub fn image(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        ContentBlock::Image {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }
}

/// What gets sent to the model as the user message content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_filename_is_case_insensitive() {
        assert_eq!(ImageFormat::from_filename("lunch.JPG"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_filename("lunch.Jpeg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_filename("dinner.PNG"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_filename("snack.webp"), Some(ImageFormat::Webp));
        assert_eq!(ImageFormat::from_filename("photo.gif"), None);
        assert_eq!(ImageFormat::from_filename("png"), None);
    }

    #[test]
    fn test_mime_type_falls_back_to_jpeg() {
        assert_eq!(ImageAttachment::new("u", "a.png").mime_type(), "image/png");
        assert_eq!(ImageAttachment::new("u", "a.webp").mime_type(), "image/webp");
        assert_eq!(ImageAttachment::new("u", "a.heic").mime_type(), "image/jpeg");
    }

    #[test]
    fn test_validate_requires_some_input() {
        let request = MealRequest::new(Some(String::new()), vec![]);
        assert_eq!(request.description, None);
        assert_eq!(request.validate(), Err(ValidationError::MissingInput));

        let request = MealRequest::new(Some("rice and salmon".to_string()), vec![]);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_validate_reports_first_unsupported_image() {
        let request = MealRequest::new(
            None,
            vec![
                ImageAttachment::new("u1", "ok.jpg"),
                ImageAttachment::new("u2", "photo.gif"),
                ImageAttachment::new("u3", "also-bad.bmp"),
            ],
        );

        assert_eq!(
            request.validate(),
            Err(ValidationError::UnsupportedFormat {
                filename: "photo.gif".to_string()
            })
        );
    }

    #[test]
    fn test_validate_caps_image_count() {
        let images = (0..6)
            .map(|i| ImageAttachment::new(format!("u{}", i), format!("{}.png", i)))
            .collect();
        let request = MealRequest::new(None, images);

        assert_eq!(
            request.validate(),
            Err(ValidationError::TooManyImages { count: 6, max: 5 })
        );
    }

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            ValidationError::MissingInput.to_string(),
            "❌ Please provide either a meal description or at least one image."
        );
        assert_eq!(
            ValidationError::UnsupportedFormat { filename: "photo.gif".to_string() }.to_string(),
            "❌ Unsupported image format: photo.gif. Please use JPG, PNG, or WebP."
        );
    }
}

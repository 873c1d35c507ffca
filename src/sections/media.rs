use crate::error::{OnboardError, Result, ValidationErrors};
use crate::models::{Media, Photo, Property};
use crate::sections::SectionForm;
use crate::wizard::progress::WizardStep;
use crate::wizard::validator::validate_media;

/// Step 5 form: ordered photo list with one cover image
#[derive(Debug, Clone, Default)]
pub struct MediaForm {
    photos: Vec<Photo>,
}

impl MediaForm {
    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn add_photo(&mut self, url: &str, caption: Option<&str>) -> Result<()> {
        let url = url.trim();
        if url.is_empty() {
            return Err(OnboardError::InvalidState("Photo URL is empty".to_string()));
        }
        if self.photos.iter().any(|p| p.url == url) {
            return Err(OnboardError::InvalidState(format!("{url} is already added")));
        }
        self.photos.push(Photo {
            url: url.to_string(),
            caption: caption.map(str::trim).filter(|c| !c.is_empty()).map(str::to_string),
            is_cover: false,
        });
        Ok(())
    }

    pub fn remove_photo(&mut self, index: usize) -> Option<Photo> {
        (index < self.photos.len()).then(|| self.photos.remove(index))
    }

    pub fn set_cover(&mut self, index: usize) -> Result<()> {
        if index >= self.photos.len() {
            return Err(OnboardError::InvalidState(format!("No photo at position {index}")));
        }
        for (i, photo) in self.photos.iter_mut().enumerate() {
            photo.is_cover = i == index;
        }
        Ok(())
    }

    /// Reorder; positions past the end move the photo to the back
    pub fn move_photo(&mut self, from: usize, to: usize) {
        if from >= self.photos.len() {
            return;
        }
        let photo = self.photos.remove(from);
        let to = to.min(self.photos.len());
        self.photos.insert(to, photo);
    }

    pub fn cover(&self) -> Option<&Photo> {
        self.photos
            .iter()
            .find(|p| p.is_cover)
            .or_else(|| self.photos.first())
    }
}

impl SectionForm for MediaForm {
    type Payload = Media;

    fn step(&self) -> WizardStep {
        WizardStep::Media
    }

    fn load(property: &Property) -> Self {
        Self {
            photos: property.media.photos.clone(),
        }
    }

    /// The first photo becomes the cover when none was chosen
    fn payload(&self) -> Media {
        let mut photos = self.photos.clone();
        if !photos.iter().any(|p| p.is_cover) {
            if let Some(first) = photos.first_mut() {
                first.is_cover = true;
            }
        }
        Media { photos }
    }

    fn validate(&self) -> ValidationErrors {
        validate_media(&self.payload())
    }

    fn is_dirty(&self, property: &Property) -> bool {
        self.payload() != property.media
    }
}

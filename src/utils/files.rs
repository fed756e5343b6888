use std::path::Path;

use uuid::Uuid;

use crate::error::AppError;

/// Public prefix under which stored blobs are served.
pub const PUBLIC_PREFIX: &str = "/static/";

pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp"];

/// Returns the lowercased extension (with its dot) if it is an accepted image type.
pub fn image_extension(filename: &str) -> Result<String, AppError> {
    let ext = Path::new(filename)
        .extension()
        .and_then(std::ffi::OsStr::to_str)
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default();

    if ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(AppError::Validation(
            "Invalid image format. Please use JPG, PNG, GIF, or WebP.".to_string(),
        ))
    }
}

fn short_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// Format: /static/images/chefs/chef_temp_{id}{ext}
pub fn chef_upload_path(ext: &str) -> String {
    format!("{}images/chefs/chef_temp_{}{}", PUBLIC_PREFIX, short_id(), ext)
}

/// Format: /static/images/chefs/chef_ai_{id}.png
pub fn chef_portrait_path() -> String {
    format!("{}images/chefs/chef_ai_{}.png", PUBLIC_PREFIX, short_id())
}

/// Format: /static/images/pizzas/pizza_{pizza_id}_{n}_{id}{ext}
pub fn pizza_image_path(pizza_id: i32, position: usize, ext: &str) -> String {
    format!(
        "{}images/pizzas/pizza_{}_{}_{}{}",
        PUBLIC_PREFIX,
        pizza_id,
        position,
        short_id(),
        ext
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_known_extensions_case_insensitively() {
        assert_eq!(image_extension("crust.JPG").unwrap(), ".jpg");
        assert_eq!(image_extension("top.webp").unwrap(), ".webp");
        assert_eq!(image_extension("a.b.Png").unwrap(), ".png");
    }

    #[test]
    fn rejects_other_files() {
        for name in ["notes.txt", "noext", "", "image.jpg.exe"] {
            assert!(
                matches!(image_extension(name), Err(AppError::Validation(_))),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn generated_paths_live_under_their_directories() {
        let upload = chef_upload_path(".jpeg");
        assert!(upload.starts_with("/static/images/chefs/chef_temp_"));
        assert!(upload.ends_with(".jpeg"));

        let portrait = chef_portrait_path();
        assert!(portrait.starts_with("/static/images/chefs/chef_ai_"));
        assert_eq!(portrait.len(), "/static/images/chefs/chef_ai_".len() + 8 + ".png".len());

        let pizza = pizza_image_path(12, 2, ".png");
        assert!(pizza.starts_with("/static/images/pizzas/pizza_12_2_"));
        assert_ne!(pizza, pizza_image_path(12, 2, ".png"));
    }
}

mod asset;
mod asset_type;
mod license;

pub use self::asset::{Asset, AssetFile, AssetRecord};
pub use self::asset_type::AssetType;
pub use self::license::LicenseType;

fn sanitize(s: impl AsRef<str>) -> String {
    s.as_ref().trim().to_lowercase().replace(['/', '-', '_', ' ', '.'], "")
}

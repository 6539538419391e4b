mod face_area;
mod is_valid;
mod nearest_site;

pub use face_area::FaceArea;
pub use is_valid::IsValid;
pub use nearest_site::NearestSite;

pub mod camera;

pub use camera::CameraHandle;

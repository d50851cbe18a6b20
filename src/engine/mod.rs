pub mod camera;
pub mod frontend;
pub mod mesh;
pub mod renderer;

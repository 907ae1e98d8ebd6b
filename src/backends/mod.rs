pub mod headless;
pub mod softbuffer;

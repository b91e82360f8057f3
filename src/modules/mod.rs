pub mod influencer;
pub mod lipsync;
pub mod media;
pub mod script;
pub mod trends;
pub mod video;

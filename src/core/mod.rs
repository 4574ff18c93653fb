// Error modeling shared by the codec, batch runner, and CLI.
pub mod error;

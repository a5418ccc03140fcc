pub mod codec;

pub use codec::LadderCodec;

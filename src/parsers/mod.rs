pub mod deserializers;
pub mod stream;

pub use stream::JsonStreamDecoder;

pub mod backend;
pub mod config;
pub mod connections;
pub mod emitters;
pub mod offset;
pub mod protocol;
pub mod resolver;
pub mod serializer;
pub mod topology;
pub mod xml;

#[cfg(test)]
pub(crate) mod fixtures;

pub use backend::PlcOpenXmlCodec;
pub use config::PlcOpenConfig;
pub use protocol::XmlDialect;
pub use serializer::LadderSerializer;

use anyhow::Result;

use crate::domain::plcopen::LadderPou;
use crate::ports::codec::LadderCodec;

use super::config::PlcOpenConfig;
use super::protocol::XmlDialect;
use super::xml;

/// PLCopen XML 编码器
#[derive(Debug, Clone)]
pub struct PlcOpenXmlCodec {
    config: PlcOpenConfig,
}

impl PlcOpenXmlCodec {
    /// 使用指定配置创建编码器
    pub fn new(config: PlcOpenConfig) -> Self {
        Self { config }
    }

    /// 快捷构建：OpenPLC 方言
    pub fn openplc() -> Self {
        Self::new(PlcOpenConfig::openplc())
    }

    /// 快捷构建：CODESYS 方言
    pub fn codesys() -> Self {
        Self::new(PlcOpenConfig::codesys())
    }
}

impl LadderCodec for PlcOpenXmlCodec {
    fn encode(&self, pou: &LadderPou) -> Result<Vec<u8>> {
        xml::write_document(pou)
    }

    fn config(&self) -> PlcOpenConfig {
        self.config.clone()
    }

    fn format_name(&self) -> &'static str {
        match self.config.dialect {
            XmlDialect::OpenPlc => "plcopen-xml",
            XmlDialect::Codesys => "codesys-xml",
        }
    }
}

use anyhow::Result;

use crate::adapters::plcopen::PlcOpenConfig;
use crate::domain::plcopen::LadderPou;

/// LD 导出编码端口
/// 说明：lowering 由序列化器完成，codec 只负责把 POU 写成目标格式。
pub trait LadderCodec {
    /// 编码：将 POU 写为目标格式的字节流
    fn encode(&self, pou: &LadderPou) -> Result<Vec<u8>>;
    /// Lowering settings the encoded output expects
    fn config(&self) -> PlcOpenConfig {
        PlcOpenConfig::default()
    }
    /// 格式名称，用于日志与输出文件扩展名
    /// e.g. "plcopen-xml"
    fn format_name(&self) -> &'static str;
}

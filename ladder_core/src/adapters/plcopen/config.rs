use super::protocol::XmlDialect;

/// PLCopen 导出配置
/// 说明：方言差异集中在这里，序列化逻辑只读取开关，不判断方言本身。
#[derive(Debug, Clone, PartialEq)]
pub struct PlcOpenConfig {
    /// 目标方言（OpenPLC/CODESYS）
    pub dialect: XmlDialect,
    /// 是否输出连线折点（position 列表）与 relPosition
    pub routing_points: bool,
    /// 全部梯级共用一对电源轨
    /// - true: 仅保留第一根左/右轨，引用左轨的连线重定向到第一根
    pub shared_power_rails: bool,
    /// `OUT` 形参写成空白（CODESYS 导入要求）
    pub blank_default_output: bool,
}

impl PlcOpenConfig {
    /// 默认 OpenPLC 配置
    pub fn openplc() -> Self {
        Self {
            dialect: XmlDialect::OpenPlc,
            routing_points: true,
            shared_power_rails: false,
            blank_default_output: false,
        }
    }

    /// 默认 CODESYS 配置
    pub fn codesys() -> Self {
        Self {
            dialect: XmlDialect::Codesys,
            routing_points: false,
            shared_power_rails: true,
            blank_default_output: true,
        }
    }

    /// 根据 dialect 生成默认配置
    pub fn new(dialect: XmlDialect) -> Self {
        match dialect {
            XmlDialect::OpenPlc => Self::openplc(),
            XmlDialect::Codesys => Self::codesys(),
        }
    }
}

impl Default for PlcOpenConfig {
    fn default() -> Self {
        Self::openplc()
    }
}

//! 条目类型公共接口

use crate::draw::{Backend, ChildPass};
use crate::error::{DrawFault, ValidationError};
use crate::item::CommonConfig;
use crate::schema::{ConfigMap, DecodedArgs};
use crate::value::AttrValue;
use crate::Point;

/// 各条目类型实现的能力集合
pub trait ItemBehavior {
    /// 写入已解码的专有参数，只处理出现的字段
    fn apply_args(&mut self, args: &DecodedArgs);

    /// 按参数名写出专有字段
    fn write_config(&self, out: &mut ConfigMap);

    /// 绘制自身，返回子项的原点与作用域
    ///
    /// 不得修改树结构。`origin` 是父项给出的屏幕坐标原点。
    fn draw(
        &self,
        common: &CommonConfig,
        backend: &mut dyn Backend,
        origin: Point,
    ) -> Result<ChildPass, DrawFault>;

    /// 条目携带的值
    fn value(&self) -> Option<AttrValue> {
        None
    }

    /// 设置值；类型不携带值时返回 `Ok(false)`
    fn set_value(&mut self, _command: &str, _value: &AttrValue) -> Result<bool, ValidationError> {
        Ok(false)
    }
}

/// 从值列表中取浮点序列，用于数据序列的 set_value
pub(crate) fn float_lists(
    command: &str,
    value: &AttrValue,
    count: usize,
) -> Result<Vec<Vec<f64>>, ValidationError> {
    let fail = || {
        ValidationError::new(
            command,
            "value",
            format!("list of {} float lists", count),
            value.describe(),
        )
    };
    let lists = value.as_list().ok_or_else(fail)?;
    if lists.len() != count {
        return Err(fail());
    }
    lists
        .iter()
        .map(|list| {
            list.as_list()
                .and_then(|items| items.iter().map(AttrValue::as_f64).collect::<Option<Vec<_>>>())
                .ok_or_else(fail)
        })
        .collect()
}

//! 格式化工具函数

use crate::takeout::models::Address;

/// 脱敏手机号，隐藏中间4位，如：138****5678；非 11 位原样返回
pub fn mask_phone(phone: &str) -> String {
    if phone.len() != 11 || !phone.chars().all(|c| c.is_ascii_digit()) {
        return phone.to_string();
    }
    format!("{}****{}", &phone[..3], &phone[7..])
}

/// 脱敏身份证号，只显示前6位和后4位
pub fn mask_id_number(id_number: &str) -> String {
    let chars: Vec<char> = id_number.chars().collect();
    if chars.len() < 10 {
        return id_number.to_string();
    }
    let start: String = chars[..6].iter().collect();
    let end: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}{}", start, "*".repeat(chars.len() - 10), end)
}

/// 完整地址：省 + 市 + 区 + 详细地址
pub fn full_address(address: &Address) -> String {
    format!(
        "{}{}{}{}",
        address.province_name, address.city_name, address.district_name, address.detail
    )
}

/// 金额展示，保留两位小数
pub fn format_amount(amount: f64) -> String {
    format!("¥{:.2}", amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_eleven_digit_phone() {
        assert_eq!(mask_phone("13812345678"), "138****5678");
        assert_eq!(mask_phone("12345"), "12345");
        assert_eq!(mask_phone(""), "");
    }

    #[test]
    fn masks_id_number_middle() {
        assert_eq!(mask_id_number("110101199003071234"), "110101********1234");
        assert_eq!(mask_id_number("123456789"), "123456789");
    }

    #[test]
    fn joins_address_parts() {
        let address = Address {
            province_name: "浙江省".to_string(),
            city_name: "杭州市".to_string(),
            district_name: "西湖区".to_string(),
            detail: "文三路 1 号".to_string(),
            ..Default::default()
        };
        assert_eq!(full_address(&address), "浙江省杭州市西湖区文三路 1 号");
        assert_eq!(format_amount(12.5), "¥12.50");
    }
}

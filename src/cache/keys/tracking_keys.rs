/// UPS 查询结果缓存键前缀
const UPS_TRACK_PREFIX: &str = "ups:track:";

/// 生成查询结果缓存键
pub fn ups_track_key(tracking_number: &str) -> String {
    format!("{}{}", UPS_TRACK_PREFIX, tracking_number.to_ascii_uppercase())
}

/// 限流计数键
pub fn rate_limit_key(ip: &str) -> String {
    format!("rate_limit:{}", ip)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracking_key_ignores_case() {
        assert_eq!(ups_track_key("1z999aa1"), "ups:track:1Z999AA1");
        assert_eq!(ups_track_key("1z999aa1"), ups_track_key("1Z999AA1"));
    }
}

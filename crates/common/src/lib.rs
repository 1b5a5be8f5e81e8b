pub mod types;
pub mod utils;
pub mod env;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_body_shape() {
        let m = types::Message::new("forbidden access");
        let v = serde_json::to_value(&m).unwrap();
        assert_eq!(v, serde_json::json!({"message": "forbidden access"}));
    }

    #[test]
    fn success_body_shape() {
        let v = serde_json::to_value(types::Success::ok()).unwrap();
        assert_eq!(v["success"], true);
    }
}

use colorbet_rs::{
    ApiResponse, BatchTradeResult, GameType, LoginResponse, Order, OrderStatus, Round,
    RoundStatus, TradeType, WalletBalance,
};
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

#[test]
fn test_login_response() {
    let json = r#"{"success":true,"data":{"token":"jwt.token.here","user":{"id":"u42","name":"Ravi","phone":"9990001111"}}}"#;
    let response: ApiResponse<LoginResponse> = serde_json::from_str(json).unwrap();

    assert!(response.success);
    let data = response.data.unwrap();
    assert_eq!(data.token, "jwt.token.here");
    let user = data.user.unwrap();
    assert_eq!(user.id, "u42");
    assert_eq!(user.phone.as_deref(), Some("9990001111"));
    assert_eq!(user.email, None);
}

#[test]
fn test_failure_envelope_without_data() {
    let json = r#"{"success":false,"message":"Insufficient wallet balance"}"#;
    let response: ApiResponse<WalletBalance> = serde_json::from_str(json).unwrap();

    assert!(!response.success);
    assert!(response.data.is_none());
    assert_eq!(response.message_or("fallback"), "Insufficient wallet balance");
}

#[test]
fn test_message_fallback() {
    let response: ApiResponse<WalletBalance> =
        serde_json::from_str(r#"{"success":false,"message":""}"#).unwrap();
    assert_eq!(response.message_or("Request failed"), "Request failed");
}

#[test]
fn test_round_parsing() {
    let json = r#"{
        "id": "r-1001",
        "roundNumber": 1001,
        "gameType": "colour",
        "status": "closed",
        "startTime": "2024-05-01T10:00:00Z",
        "endTime": "2024-05-01T10:03:00Z",
        "result": "violet"
    }"#;
    let round: Round = serde_json::from_str(json).unwrap();

    assert_eq!(round.game_type, GameType::Color);
    assert_eq!(round.status, RoundStatus::Closed);
    assert!(!round.is_open());
    assert_eq!(
        round.end_time,
        Some(Utc.with_ymd_and_hms(2024, 5, 1, 10, 3, 0).unwrap())
    );
}

#[test]
fn test_order_history_parsing() {
    let json = r#"{"success":true,"data":[
        {"id":"o1","roundId":"r1","tradeType":"number","selection":"7","amount":"10.00",
         "status":"won","payout":"90.00","createdAt":"2024-05-01T10:01:30Z"},
        {"id":"o2","roundId":"r1","tradeType":"colour","selection":"red","amount":5,
         "status":"lost"}
    ]}"#;
    let response: ApiResponse<Vec<Order>> = serde_json::from_str(json).unwrap();
    let orders = response.data.unwrap();

    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].trade_type, TradeType::Number);
    assert_eq!(orders[0].status, OrderStatus::Won);
    assert_eq!(orders[0].amount, dec!(10));
    assert_eq!(orders[0].payout, Some(dec!(90)));
    assert_eq!(orders[1].trade_type, TradeType::Colour);
    assert_eq!(orders[1].payout, None);
    assert!(orders[1].created_at.is_none());
}

#[test]
fn test_batch_result_defaults() {
    let result: BatchTradeResult = serde_json::from_str("{}").unwrap();
    assert_eq!(result, BatchTradeResult::default());
}

//! Email bodies

use crate::shared::types::PriceAlert;

pub const SENDER_NAME: &str = "RoboRate";

pub fn alert_subject(alert: &PriceAlert) -> String {
    format!("{} price update", alert.asset)
}

pub fn alert_text(alert: &PriceAlert) -> String {
    format!(
        "Today the {} {} price: ${} (was ${})",
        alert.direction, alert.asset, alert.price, alert.previous
    )
}

pub fn alert_html(alert: &PriceAlert) -> String {
    format!(
        r#"<html>
  <head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <style type="text/css">
      body {{ font-family: Arial, sans-serif; margin: 0; padding: 0; }}
      .container {{ width: 100%; max-width: 600px; margin: 0 auto; padding: 20px; }}
      .footer {{ text-align: center; color: gray; font-size: 12px; margin-top: 20px; }}
      h1, h2 {{ text-align: center; color: #283a48; }}
    </style>
  </head>
  <body>
    <div class="container">
      <h1>{asset} = ${price}</h1>
      <h2>Today the {direction} {asset} price was updated (${previous} &rarr; ${price})</h2>
      <div class="footer">{sender}</div>
    </div>
  </body>
</html>
"#,
        asset = alert.asset,
        price = alert.price,
        previous = alert.previous,
        direction = alert.direction,
        sender = SENDER_NAME,
    )
}

pub fn test_text(probe: &str) -> String {
    format!("This is a test email sent from {}. Scraped result: {}", SENDER_NAME, probe)
}

pub fn test_html(probe: &str) -> String {
    format!("<b>{}</b>", test_text(probe))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::types::Direction;
    use rust_decimal_macros::dec;

    fn alert(direction: Direction) -> PriceAlert {
        PriceAlert {
            asset: "BTC".to_string(),
            price: dec!(50100.50),
            previous: dec!(50000.12),
            direction,
        }
    }

    #[test]
    fn test_subject_names_asset() {
        assert_eq!(alert_subject(&alert(Direction::High)), "BTC price update");
    }

    #[test]
    fn test_bodies_follow_direction() {
        assert_eq!(
            alert_text(&alert(Direction::High)),
            "Today the highest BTC price: $50100.50 (was $50000.12)"
        );
        assert!(alert_text(&alert(Direction::Low)).starts_with("Today the lowest BTC"));

        let html = alert_html(&alert(Direction::Low));
        assert!(html.contains("<h1>BTC = $50100.50</h1>"));
        assert!(html.contains("Today the lowest BTC price was updated"));
    }
}

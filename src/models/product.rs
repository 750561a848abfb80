// src/models/product.rs - listing shape for the products tab

use serde::{Deserialize, Serialize};

/// One marketplace listing as the products tab would render it: thumbnail,
/// title and a formatted price. No fetch path exists for these yet; the tab
/// renders its empty state until one does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub title: String,
    pub images: Vec<String>,
    /// Price in centavos.
    pub price_cents: i64,
}

impl Product {
    /// First image, used as the card thumbnail.
    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    pub fn price_label(&self) -> String {
        format_price_brl(self.price_cents)
    }
}

/// Renders a price in centavos the way `pt-BR`/BRL formatting does:
/// `R$ 1.234,56`.
pub fn format_price_brl(price_cents: i64) -> String {
    let sign = if price_cents < 0 { "-" } else { "" };
    let cents = price_cents.unsigned_abs();
    let reais = cents / 100;
    let fraction = cents % 100;

    let digits = reais.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    format!("{sign}R$ {grouped},{fraction:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_plain_and_grouped_amounts() {
        assert_eq!(format_price_brl(0), "R$ 0,00");
        assert_eq!(format_price_brl(950), "R$ 9,50");
        assert_eq!(format_price_brl(123_456), "R$ 1.234,56");
        assert_eq!(format_price_brl(100_000_000), "R$ 1.000.000,00");
    }

    #[test]
    fn formats_negative_amounts() {
        assert_eq!(format_price_brl(-12_34), "-R$ 12,34");
    }

    #[test]
    fn price_label_uses_brl_formatting() {
        let product = Product {
            id: "p1".into(),
            title: "Bicicleta aro 29".into(),
            images: vec!["https://cdn.example.com/bike.png".into()],
            price_cents: 89_900,
        };
        assert_eq!(product.price_label(), "R$ 899,00");
        assert_eq!(product.thumbnail(), Some("https://cdn.example.com/bike.png"));
    }
}

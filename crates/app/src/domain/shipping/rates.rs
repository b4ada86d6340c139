//! Rate normalisation.

use crate::domain::{
    settings::records::ShippingOrigin,
    shipping::{
        data::ParcelInput,
        provider::{Parcel, RawRate},
    },
};

/// Courier allow-list used when a caller does not name one.
pub const DEFAULT_COURIERS: &str = "jne,sicepat,jnt,anteraja,tiki,ninja,idexpress,pos";

/// Origin used when the store has none configured.
pub const FALLBACK_ORIGIN_AREA_ID: &str = "IDNP6IDNC153IDND2256IDZ10110";

pub const FALLBACK_ORIGIN_POSTAL_CODE: &str = "10110";

/// Grams.
pub const DEFAULT_PARCEL_WEIGHT: u32 = 500;

/// Centimetres.
pub const DEFAULT_PARCEL_DIMENSION: u32 = 10;

const DEFAULT_DURATION_UNIT: &str = "days";

/// A priced, available courier service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateQuote {
    pub courier_company: String,
    pub courier_type: String,
    pub courier_name: String,
    pub service_name: String,
    pub description: String,
    pub price: u64,
    pub etd: String,
    pub etd_unit: String,
}

/// Flatten flat and nested rate entries into priced, available quotes,
/// cheapest first.
#[must_use]
pub fn flatten_rates(pricing: &[RawRate]) -> Vec<RateQuote> {
    let mut quotes = Vec::new();

    for entry in pricing {
        match entry.rates.as_deref() {
            Some(nested) if !nested.is_empty() => {
                let company = entry.company.clone().unwrap_or_default();

                for rate in nested {
                    if rate.available == Some(false) {
                        continue;
                    }

                    let Some(price) = rate.price else {
                        continue;
                    };

                    let courier_name = rate
                        .courier_name
                        .clone()
                        .or_else(|| entry.courier_name.clone())
                        .unwrap_or_else(|| company.clone());

                    quotes.push(quote(rate, company.clone(), courier_name, price));
                }
            }
            _ => {
                let Some(price) = entry.price else {
                    continue;
                };

                let company = entry
                    .company
                    .clone()
                    .or_else(|| entry.courier_company.clone())
                    .unwrap_or_default();

                let courier_name = entry.courier_name.clone().unwrap_or_else(|| company.clone());

                quotes.push(quote(entry, company, courier_name, price));
            }
        }
    }

    quotes.sort_by_key(|q| q.price);

    quotes
}

fn quote(rate: &RawRate, courier_company: String, courier_name: String, price: u64) -> RateQuote {
    RateQuote {
        courier_company,
        courier_type: rate
            .kind
            .clone()
            .or_else(|| rate.courier_service_code.clone())
            .unwrap_or_default(),
        courier_name,
        service_name: rate
            .courier_service_name
            .clone()
            .or_else(|| rate.service_name.clone())
            .or_else(|| rate.description.clone())
            .unwrap_or_default(),
        description: rate.description.clone().unwrap_or_default(),
        price,
        etd: rate.shipment_duration_range.clone().unwrap_or_default(),
        etd_unit: rate
            .shipment_duration_unit
            .clone()
            .unwrap_or_else(|| DEFAULT_DURATION_UNIT.to_string()),
    }
}

/// Price of the first service matching `courier_type`. Zero counts as no
/// quote.
#[must_use]
pub fn find_quote(pricing: &[RawRate], courier_type: &str) -> Option<u64> {
    pricing
        .iter()
        .find_map(|entry| match entry.rates.as_deref() {
            Some(nested) if !nested.is_empty() => nested
                .iter()
                .find(|rate| rate.kind.as_deref() == Some(courier_type))
                .map(|rate| rate.price.unwrap_or_default()),
            _ => {
                let kind = entry.kind.as_deref().or(entry.courier_service_code.as_deref());

                (kind == Some(courier_type)).then_some(entry.price).flatten()
            }
        })
        .filter(|price| *price > 0)
}

/// Postal code embedded after the last `IDZ` marker of an area id.
#[must_use]
pub fn postal_code_fallback(area_id: &str) -> Option<u32> {
    let (_, digits) = area_id.rsplit_once("IDZ")?;

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    digits.parse().ok()
}

#[must_use]
pub fn parse_postal_code(code: &str) -> Option<u32> {
    code.trim().parse().ok()
}

/// First non-blank origin among the override, the stored store origin and
/// the fallback origin, resolved per field.
#[must_use]
pub fn resolve_origin(
    area_id: Option<&str>,
    postal_code: Option<&str>,
    stored: &ShippingOrigin,
) -> ShippingOrigin {
    ShippingOrigin {
        area_id: first_non_blank(&[area_id, Some(stored.area_id.as_str())], FALLBACK_ORIGIN_AREA_ID),
        postal_code: first_non_blank(
            &[postal_code, Some(stored.postal_code.as_str())],
            FALLBACK_ORIGIN_POSTAL_CODE,
        ),
    }
}

fn first_non_blank(candidates: &[Option<&str>], fallback: &str) -> String {
    candidates
        .iter()
        .flatten()
        .find(|v| !v.trim().is_empty())
        .copied()
        .unwrap_or(fallback)
        .to_string()
}

/// Fill in default weight, dimensions and quantity.
#[must_use]
pub fn normalize_parcels(items: &[ParcelInput]) -> Vec<Parcel> {
    items
        .iter()
        .map(|item| Parcel {
            name: item.name.clone(),
            description: None,
            value: item.value.unwrap_or_default(),
            quantity: item.quantity.unwrap_or(1),
            weight: item.weight.unwrap_or(DEFAULT_PARCEL_WEIGHT),
            length: item.length.unwrap_or(DEFAULT_PARCEL_DIMENSION),
            width: item.width.unwrap_or(DEFAULT_PARCEL_DIMENSION),
            height: item.height.unwrap_or(DEFAULT_PARCEL_DIMENSION),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(company: &str, kind: &str, price: Option<u64>) -> RawRate {
        RawRate {
            company: Some(company.to_string()),
            kind: Some(kind.to_string()),
            price,
            ..RawRate::default()
        }
    }

    fn nested(company: &str, rates: Vec<RawRate>) -> RawRate {
        RawRate {
            company: Some(company.to_string()),
            courier_name: Some(company.to_uppercase()),
            rates: Some(rates),
            ..RawRate::default()
        }
    }

    #[test]
    fn flatten_sorts_by_ascending_price() {
        let pricing = vec![
            flat("sicepat", "reg", Some(21_000)),
            nested(
                "jne",
                vec![
                    RawRate {
                        kind: Some("yes".to_string()),
                        price: Some(35_000),
                        ..RawRate::default()
                    },
                    RawRate {
                        kind: Some("reg".to_string()),
                        price: Some(18_000),
                        ..RawRate::default()
                    },
                ],
            ),
            flat("anteraja", "reg", Some(19_500)),
        ];

        let prices: Vec<u64> = flatten_rates(&pricing).iter().map(|q| q.price).collect();

        assert_eq!(prices, vec![18_000, 19_500, 21_000, 35_000]);
    }

    #[test]
    fn flatten_skips_unpriced_and_unavailable() {
        let pricing = vec![
            flat("jnt", "ez", None),
            nested(
                "jne",
                vec![
                    RawRate {
                        kind: Some("reg".to_string()),
                        price: Some(18_000),
                        available: Some(false),
                        ..RawRate::default()
                    },
                    RawRate {
                        kind: Some("oke".to_string()),
                        price: None,
                        ..RawRate::default()
                    },
                ],
            ),
        ];

        assert!(flatten_rates(&pricing).is_empty());
    }

    #[test]
    fn flatten_fills_names_and_duration_defaults() {
        let pricing = vec![nested(
            "jne",
            vec![RawRate {
                courier_service_code: Some("reg".to_string()),
                description: Some("Layanan reguler".to_string()),
                price: Some(18_000),
                shipment_duration_range: Some("2 - 3".to_string()),
                ..RawRate::default()
            }],
        )];

        let quotes = flatten_rates(&pricing);

        assert_eq!(
            quotes,
            vec![RateQuote {
                courier_company: "jne".to_string(),
                courier_type: "reg".to_string(),
                courier_name: "JNE".to_string(),
                service_name: "Layanan reguler".to_string(),
                description: "Layanan reguler".to_string(),
                price: 18_000,
                etd: "2 - 3".to_string(),
                etd_unit: "days".to_string(),
            }]
        );
    }

    #[test]
    fn flat_entry_uses_courier_company_when_company_missing() {
        let pricing = vec![RawRate {
            courier_company: Some("tiki".to_string()),
            kind: Some("eco".to_string()),
            price: Some(12_000),
            ..RawRate::default()
        }];

        let quotes = flatten_rates(&pricing);

        assert_eq!(quotes[0].courier_company, "tiki");
        assert_eq!(quotes[0].courier_name, "tiki");
    }

    #[test]
    fn find_quote_matches_nested_type() {
        let pricing = vec![nested(
            "jne",
            vec![
                RawRate {
                    kind: Some("yes".to_string()),
                    price: Some(35_000),
                    ..RawRate::default()
                },
                RawRate {
                    kind: Some("reg".to_string()),
                    price: Some(18_000),
                    ..RawRate::default()
                },
            ],
        )];

        assert_eq!(find_quote(&pricing, "reg"), Some(18_000));
    }

    #[test]
    fn find_quote_matches_flat_service_code() {
        let pricing = vec![RawRate {
            courier_service_code: Some("reg".to_string()),
            price: Some(22_000),
            ..RawRate::default()
        }];

        assert_eq!(find_quote(&pricing, "reg"), Some(22_000));
    }

    #[test]
    fn find_quote_treats_zero_and_missing_as_none() {
        assert_eq!(find_quote(&[flat("jne", "reg", Some(0))], "reg"), None);
        assert_eq!(find_quote(&[flat("jne", "reg", Some(9_000))], "yes"), None);
        assert_eq!(find_quote(&[], "reg"), None);
    }

    #[test]
    fn postal_code_fallback_reads_digits_after_last_marker() {
        assert_eq!(postal_code_fallback("IDNP6IDNC153IDND2256IDZ10110"), Some(10110));
        assert_eq!(postal_code_fallback("IDNP6IDZ1IDZ12440"), Some(12440));
        assert_eq!(postal_code_fallback("IDNP6IDNC153"), None);
        assert_eq!(postal_code_fallback("IDNP6IDZ"), None);
        assert_eq!(postal_code_fallback("IDNP6IDZ12a40"), None);
    }

    #[test]
    fn resolve_origin_prefers_override_then_stored_then_fallback() {
        let stored = ShippingOrigin {
            area_id: "IDNSTORED".to_string(),
            postal_code: String::new(),
        };

        let overridden = resolve_origin(Some("IDNOVERRIDE"), Some("40111"), &stored);
        let from_store = resolve_origin(None, Some("  "), &stored);
        let fallback = resolve_origin(None, None, &ShippingOrigin::default());

        assert_eq!(overridden.area_id, "IDNOVERRIDE");
        assert_eq!(overridden.postal_code, "40111");
        assert_eq!(from_store.area_id, "IDNSTORED");
        assert_eq!(from_store.postal_code, FALLBACK_ORIGIN_POSTAL_CODE);
        assert_eq!(fallback.area_id, FALLBACK_ORIGIN_AREA_ID);
    }

    #[test]
    fn normalize_parcels_applies_defaults() {
        let parcels = normalize_parcels(&[
            ParcelInput::default(),
            ParcelInput {
                weight: Some(1_200),
                length: Some(30),
                quantity: Some(2),
                ..ParcelInput::default()
            },
        ]);

        assert_eq!(
            (parcels[0].weight, parcels[0].length, parcels[0].width, parcels[0].height),
            (500, 10, 10, 10)
        );
        assert_eq!(parcels[0].quantity, 1);
        assert_eq!((parcels[1].weight, parcels[1].length, parcels[1].quantity), (1_200, 30, 2));
    }
}

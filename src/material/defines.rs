//! Preprocessor defines compiled into shader source.

use std::collections::BTreeMap;
use std::fmt::Write;

use super::validate_identifier;
use crate::error::{LucentError, NameKind};

/// How a define's string value reads once substituted into WGSL.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefineValue {
    /// Integer literal that fits an `i32`.
    Int(i32),
    /// Finite decimal literal.
    Float(f64),
    /// `true` or `false`.
    Bool(bool),
    /// Anything else: only meaningful to `#ifdef`.
    Flag,
}

impl DefineValue {
    /// Classify a define value string.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        match value {
            "true" => return Self::Bool(true),
            "false" => return Self::Bool(false),
            _ => {}
        }
        if let Ok(i) = value.parse::<i32>() {
            return Self::Int(i);
        }
        match value.parse::<f64>() {
            Ok(f) if f.is_finite() && value.contains('.') => Self::Float(f),
            _ => Self::Flag,
        }
    }
}

/// Integer and float renderings of one floor-quantized count.
///
/// Both strings come from the same integer, so they always agree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleDefines {
    /// The quantized value, `floor(v)`.
    pub count: i64,
    /// `count` with no decimals, e.g. `"60"`.
    pub int_form: String,
    /// `count` with one decimal, e.g. `"60.0"`.
    pub float_form: String,
}

impl SampleDefines {
    /// Floor `value` and render both forms. The result saturates to the
    /// `i32` range so the integer form always stays a valid WGSL `i32`
    /// literal. NaN quantizes to zero.
    #[must_use]
    pub fn quantize(value: f64) -> Self {
        let count = (value.floor() as i64)
            .clamp(i64::from(i32::MIN), i64::from(i32::MAX));
        Self {
            count,
            int_form: count.to_string(),
            float_form: format!("{count}.0"),
        }
    }
}

/// Define symbols owned by one material, kept sorted so generated source is
/// stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefineTable {
    entries: BTreeMap<String, String>,
}

impl DefineTable {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `symbol` to `value`.
    ///
    /// # Errors
    ///
    /// Returns [`LucentError::InvalidName`] if `symbol` is not a valid
    /// identifier.
    pub fn set(
        &mut self,
        symbol: &str,
        value: impl Into<String>,
    ) -> Result<(), LucentError> {
        validate_identifier(NameKind::Define, symbol)?;
        self.insert_known(symbol, value.into());
        Ok(())
    }

    /// Insert without validation; for symbols fixed at compile time.
    pub(crate) fn insert_known(&mut self, symbol: &str, value: String) {
        debug_assert!(validate_identifier(NameKind::Define, symbol).is_ok());
        let _ = self.entries.insert(symbol.to_owned(), value);
    }

    /// Remove `symbol`, returning its previous value.
    pub fn remove(&mut self, symbol: &str) -> Option<String> {
        self.entries.remove(symbol)
    }

    /// Value of `symbol`.
    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<&str> {
        self.entries.get(symbol).map(String::as_str)
    }

    /// Parse `symbol` as an integer.
    #[must_use]
    pub fn get_int(&self, symbol: &str) -> Option<i64> {
        self.get(symbol)?.trim().parse().ok()
    }

    /// `(symbol, value)` pairs in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of defines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// WGSL `const` declarations for every define with a typed value.
    ///
    /// Flags produce no declaration; they only reach the preprocessor.
    #[must_use]
    pub fn wgsl_constants(&self) -> String {
        let mut out = String::new();
        for (symbol, value) in self.iter() {
            let _ = match DefineValue::parse(value) {
                DefineValue::Int(i) => {
                    writeln!(out, "const {symbol}: i32 = {i};")
                }
                DefineValue::Float(f) => {
                    writeln!(out, "const {symbol}: f32 = {f:?};")
                }
                DefineValue::Bool(b) => {
                    writeln!(out, "const {symbol}: bool = {b};")
                }
                DefineValue::Flag => continue,
            };
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantize_floors_instead_of_rounding() {
        let cases: &[(f64, i64, &str, &str)] = &[
            (60.0, 60, "60", "60.0"),
            (59.99, 59, "59", "59.0"),
            (0.5, 0, "0", "0.0"),
            (0.0, 0, "0", "0.0"),
            (-0.0, 0, "0", "0.0"),
            (-0.25, -1, "-1", "-1.0"),
            (-3.7, -4, "-4", "-4.0"),
            (128.9, 128, "128", "128.0"),
        ];
        for &(input, count, int_form, float_form) in cases {
            let defines = SampleDefines::quantize(input);
            assert_eq!(defines.count, count, "count for {input}");
            assert_eq!(defines.int_form, int_form, "int form for {input}");
            assert_eq!(
                defines.float_form, float_form,
                "float form for {input}"
            );
        }
    }

    #[test]
    fn quantize_handles_non_finite_input() {
        assert_eq!(SampleDefines::quantize(f64::NAN).count, 0);
        assert_eq!(
            SampleDefines::quantize(f64::INFINITY).count,
            i64::from(i32::MAX)
        );
        assert_eq!(
            SampleDefines::quantize(f64::NEG_INFINITY).count,
            i64::from(i32::MIN)
        );
    }

    #[test]
    fn quantize_saturates_to_the_i32_range() {
        let top = SampleDefines::quantize(3.0e9);
        assert_eq!(top.count, i64::from(i32::MAX));
        assert_eq!(DefineValue::parse(&top.int_form), DefineValue::Int(i32::MAX));
        assert_eq!(top.float_form, format!("{}.0", i32::MAX));

        let edge = SampleDefines::quantize(f64::from(i32::MAX) + 0.5);
        assert_eq!(edge.count, i64::from(i32::MAX));

        let bottom = SampleDefines::quantize(-3.0e9);
        assert_eq!(bottom.int_form, i32::MIN.to_string());
    }

    #[test]
    fn both_forms_agree_numerically() {
        for step in -200..200 {
            let v = f64::from(step) * 0.37;
            let d = SampleDefines::quantize(v);
            let from_int: f64 = d.int_form.parse().unwrap();
            let from_float: f64 = d.float_form.parse().unwrap();
            assert_eq!(from_int, from_float);
            assert_eq!(from_int, v.floor());
        }
    }

    #[test]
    fn set_validates_symbols() {
        let mut table = DefineTable::new();
        assert!(table.set("SAMPLES_INT", "60").is_ok());
        assert!(matches!(
            table.set("2FAST", "1"),
            Err(LucentError::InvalidName {
                kind: NameKind::Define,
                ..
            })
        ));
        assert!(table.set("", "1").is_err());
        assert_eq!(table.len(), 1);
        assert_eq!(table.get_int("SAMPLES_INT"), Some(60));
    }

    #[test]
    fn classify_values() {
        assert_eq!(DefineValue::parse("60"), DefineValue::Int(60));
        assert_eq!(DefineValue::parse("60.0"), DefineValue::Float(60.0));
        assert_eq!(DefineValue::parse("true"), DefineValue::Bool(true));
        assert_eq!(DefineValue::parse(""), DefineValue::Flag);
        assert_eq!(DefineValue::parse("inf"), DefineValue::Flag);
        assert_eq!(DefineValue::parse("1e5"), DefineValue::Flag);
        assert_eq!(DefineValue::parse("vec3(1.0)"), DefineValue::Flag);
    }

    #[test]
    fn constants_are_typed_and_sorted() {
        let mut table = DefineTable::new();
        table.set("SAMPLES_INT", "60").unwrap();
        table.set("SAMPLES_FLOAT", "60.0").unwrap();
        table.set("DITHERING", "").unwrap();
        table.set("USE_CLAMP", "true").unwrap();
        assert_eq!(
            table.wgsl_constants(),
            "const SAMPLES_FLOAT: f32 = 60.0;\n\
             const SAMPLES_INT: i32 = 60;\n\
             const USE_CLAMP: bool = true;\n"
        );
    }
}

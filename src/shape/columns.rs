use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::error::PipelineError;

/// Legacy header names remapped to their canonical form, applied in order
/// and only when the canonical name is not already taken.
pub const LEGACY_ALIASES: &[(&str, &str)] = &[
    ("razao_social", "razaosocial"),
    ("informacao_pdd", "informacaopdd"),
    ("cnpj_", "cnpj"),
];

/// Normalize one header: trim, decompose (NFKD), drop combining marks, keep
/// only ASCII letters and digits, lowercase. Idempotent; symbol-only input
/// yields the empty string.
pub fn norm_col(text: &str) -> String {
    text.trim()
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Rename each legacy alias to its canonical name, skipping any rename whose
/// target already exists.
pub fn apply_aliases(headers: &mut [String]) {
    for (legacy, canonical) in LEGACY_ALIASES {
        if headers.iter().any(|h| h == canonical) {
            continue;
        }
        if let Some(h) = headers.iter_mut().find(|h| h.as_str() == *legacy) {
            *h = (*canonical).to_string();
        }
    }
}

/// Strip one trailing non-alphanumeric artifact character per header, only
/// when the stripped form is non-empty and not already a header.
pub fn strip_trailing_artifacts(headers: &mut [String]) {
    for i in 0..headers.len() {
        let Some(last) = headers[i].chars().last() else {
            continue;
        };
        if last.is_ascii_alphanumeric() {
            continue;
        }
        let stripped = headers[i][..headers[i].len() - last.len_utf8()].to_string();
        if !stripped.is_empty() && !headers.iter().any(|x| *x == stripped) {
            headers[i] = stripped;
        }
    }
}

/// Run the full header pipeline: normalizer, alias table, artifact strip,
/// uniqueness validation. Empty or colliding names are schema errors.
pub fn normalize_headers(headers: &[String]) -> Result<Vec<String>, PipelineError> {
    let mut out = Vec::with_capacity(headers.len());
    for raw in headers {
        let n = norm_col(raw);
        if n.is_empty() {
            return Err(PipelineError::Schema(format!(
                "column {raw:?} normalizes to an empty name"
            )));
        }
        out.push(n);
    }

    apply_aliases(&mut out);
    strip_trailing_artifacts(&mut out);

    for (i, h) in out.iter().enumerate() {
        if out[..i].contains(h) {
            return Err(PipelineError::Schema(format!(
                "duplicate column {h:?} after normalization"
            )));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn strips_accents_and_symbols() {
        assert_eq!(norm_col("Razão Social"), "razaosocial");
        assert_eq!(norm_col("  Conta "), "conta");
        assert_eq!(norm_col("CNPJ_"), "cnpj");
        assert_eq!(norm_col("Informação PDD"), "informacaopdd");
    }

    #[test]
    fn symbol_only_input_normalizes_to_empty() {
        assert_eq!(norm_col("###"), "");
        assert_eq!(norm_col("   "), "");
        assert_eq!(norm_col(""), "");
    }

    #[test]
    fn norm_col_is_idempotent_and_ascii_lowercase() {
        for s in ["Razão Social", "çãõ-12_3", "ALREADY", "müller's", "日本語abc"] {
            let once = norm_col(s);
            assert_eq!(norm_col(&once), once);
            assert!(once.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
        }
    }

    #[test]
    fn alias_applies_when_canonical_absent() {
        let mut headers = owned(&["cnpj_", "conta"]);
        apply_aliases(&mut headers);
        assert_eq!(headers, owned(&["cnpj", "conta"]));
    }

    #[test]
    fn alias_never_overwrites_existing_canonical() {
        let mut headers = owned(&["cnpj_", "cnpj"]);
        apply_aliases(&mut headers);
        assert_eq!(headers, owned(&["cnpj_", "cnpj"]));
    }

    #[test]
    fn artifact_strip_avoids_collisions() {
        let mut headers = owned(&["tipo_", "conta"]);
        strip_trailing_artifacts(&mut headers);
        assert_eq!(headers, owned(&["tipo", "conta"]));

        let mut colliding = owned(&["tipo_", "tipo"]);
        strip_trailing_artifacts(&mut colliding);
        assert_eq!(colliding, owned(&["tipo_", "tipo"]));
    }

    #[test]
    fn full_pass_on_realistic_headers() {
        let headers = owned(&["SAP", "Conta", "Tipo", "CNPJ_", "Razão Social", "Informação PDD"]);
        let out = normalize_headers(&headers).unwrap();
        assert_eq!(
            out,
            owned(&["sap", "conta", "tipo", "cnpj", "razaosocial", "informacaopdd"])
        );
    }

    #[test]
    fn empty_normalized_header_is_schema_error() {
        let err = normalize_headers(&owned(&["Conta", "###"])).unwrap_err();
        assert!(err.to_string().contains("empty name"));
    }

    #[test]
    fn duplicate_normalized_header_is_schema_error() {
        let err = normalize_headers(&owned(&["Conta", "CONTA "])).unwrap_err();
        assert!(err.to_string().contains("duplicate column"));
    }
}

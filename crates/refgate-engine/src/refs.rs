//! Ref-update collection: stdin lines to structured records.

use refgate_core::{GateError, HookConfig, RefKind, RefUpdate, Result};

/// Parse the raw stdin content into ref-update records.
///
/// Each line must be `"<old-hash> <new-hash> <ref-name>"` with exactly
/// three non-empty fields, 40-hex hashes, and a ref name under
/// `refs/heads/` or `refs/tags/`. Blank lines are not tolerated; the
/// server never sends them.
///
/// # Errors
///
/// Returns [`GateError::Input`] on the first malformed line. The whole
/// run aborts; a half-parsed push must not be policed.
///
/// # Examples
///
/// ```
/// use refgate_engine::refs::parse_ref_updates;
///
/// let input = "0000000000000000000000000000000000000000 \
///              1111111111111111111111111111111111111111 \
///              refs/heads/main\n";
/// let updates = parse_ref_updates(input).unwrap();
/// assert_eq!(updates.len(), 1);
/// assert!(updates[0].is_create());
/// ```
pub fn parse_ref_updates(input: &str) -> Result<Vec<RefUpdate>> {
    input.lines().map(parse_line).collect()
}

fn parse_line(line: &str) -> Result<RefUpdate> {
    let mut fields = line.split_whitespace();
    let (Some(from), Some(to), Some(ref_name), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(GateError::Input(format!(
            "expected '<old> <new> <refname>', got: {line}"
        )));
    };

    if !is_hash(from) || !is_hash(to) {
        return Err(GateError::Input(format!(
            "malformed object hash in ref update: {line}"
        )));
    }

    let kind = ref_kind(ref_name)
        .ok_or_else(|| GateError::Input(format!("unrecognized ref name: {ref_name}")))?;

    Ok(RefUpdate {
        from: from.to_string(),
        to: to.to_string(),
        ref_name: ref_name.to_string(),
        kind,
    })
}

fn is_hash(token: &str) -> bool {
    token.len() == 40 && token.chars().all(|c| c.is_ascii_hexdigit())
}

fn ref_kind(ref_name: &str) -> Option<RefKind> {
    if let Some(rest) = ref_name.strip_prefix("refs/heads/") {
        (!rest.is_empty()).then_some(RefKind::Branch)
    } else if let Some(rest) = ref_name.strip_prefix("refs/tags/") {
        (!rest.is_empty()).then_some(RefKind::Tag)
    } else {
        None
    }
}

/// The one update targeting the protected branch, if any.
///
/// A push cannot update the same ref twice, so at most one entry can
/// match; the first match is returned.
pub fn protected_update<'a>(updates: &'a [RefUpdate], config: &HookConfig) -> Option<&'a RefUpdate> {
    updates.iter().find(|u| config.protects(&u.ref_name))
}

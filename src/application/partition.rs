use crate::domain::participant::ParticipantSite;

/// Picks the participants a request works on.
///
/// * no ids (absent or empty): the whole roster.
/// * `include` (default): the participants named in `ids`. Ids missing from
///   the roster are simply absent from the result.
/// * `!include`: the roster minus the participants named in `ids`.
///
/// The `"ALL"` sentinel gets no special treatment here; it is matched as a
/// literal id. Callers that want "ALL" to mean the whole roster must say so
/// before calling.
pub fn partition(
    roster: &[ParticipantSite],
    ids: Option<&[String]>,
    include: Option<bool>,
) -> Vec<ParticipantSite> {
    let ids = match ids {
        Some(ids) if !ids.is_empty() => ids,
        _ => return roster.to_vec(),
    };

    let named = |site: &&ParticipantSite| ids.iter().any(|id| *id == site.id);
    if include.unwrap_or(true) {
        roster.iter().filter(named).cloned().collect()
    } else {
        roster.iter().filter(|site| !named(site)).cloned().collect()
    }
}

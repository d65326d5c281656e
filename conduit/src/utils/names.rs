//! Name normalization shared by extraction, resolution and binding.
//!
//! Parameter names, aliases and incoming parameter keys all pass through
//! [`sanitize_name`] so that lookups compare like with like.

/// Separator between path segments of a callable locator.
pub const PATH_SEPARATOR: &str = "::";

/// Strip leading underscores and lowercase.
pub fn sanitize_name(name: &str) -> String {
    name.trim().trim_start_matches('_').to_lowercase()
}

/// Turn a `::`-separated locator into an identifier usable as a flat key.
///
/// `game::Lights::set_color` becomes `game_lights_set_color`.
pub fn sanitize_locator(locator: &str) -> String {
    let flattened = locator
        .split(PATH_SEPARATOR)
        .map(|segment| segment.replace(['.', '+', '<', '>', ' '], "_"))
        .collect::<Vec<_>>()
        .join("_");
    sanitize_name(&flattened)
}

/// Globally unique parameter key: `{sanitized action id}_{sanitized parameter name}`.
pub fn qualified_parameter_name(action_id: &str, parameter_name: &str) -> String {
    format!(
        "{}_{}",
        sanitize_locator(action_id),
        sanitize_name(parameter_name)
    )
}

/// Split a callable locator at its last `::` into (declaring type, method).
///
/// Returns `None` when the locator has no declaring type.
pub fn split_locator(locator: &str) -> Option<(&str, &str)> {
    let (owner, method) = locator.rsplit_once(PATH_SEPARATOR)?;
    if owner.is_empty() || method.is_empty() {
        return None;
    }
    Some((owner, method))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_underscores_and_case() {
        assert_eq!(sanitize_name("__Count"), "count");
        assert_eq!(sanitize_name("color"), "color");
        assert_eq!(sanitize_name("  _Total "), "total");
    }

    #[test]
    fn locators_flatten_to_underscores() {
        assert_eq!(
            sanitize_locator("game::Lights::set_color"),
            "game_lights_set_color"
        );
        assert_eq!(
            qualified_parameter_name("game::Lights::set_color", "_Color"),
            "game_lights_set_color_color"
        );
    }

    #[test]
    fn split_uses_last_separator() {
        assert_eq!(
            split_locator("game::lights::Lights::toggle"),
            Some(("game::lights::Lights", "toggle"))
        );
        assert_eq!(split_locator("toggle"), None);
        assert_eq!(split_locator("::toggle"), None);
    }
}

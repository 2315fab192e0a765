// Shared prompt fragments.
// Each service that calls the model keeps its own prompts.rs alongside it;
// this file holds the cross-cutting pieces.

/// Closing instruction for prompts whose reply must be a bare JSON object.
pub const JSON_ONLY_INSTRUCTION: &str = "Return only the JSON response, no additional text.";

/// Score bands shared by every section and by locally built results.
pub const STATUS_BANDS: &str =
    "Status levels: \"poor\" (0-60), \"fair\" (61-75), \"good\" (76-85), \"excellent\" (86-100)";

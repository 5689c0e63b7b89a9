use crate::hub::ModelDescriptor;

/// Parameter-count markers that disqualify a model under `small_only`.
pub const LARGE_SIZE_MARKERS: [&str; 5] = ["70b", "30b", "40b", "65b", "13b"];

/// Parameter-count markers of which `small_only` requires at least one.
pub const SMALL_SIZE_MARKERS: [&str; 6] = ["1b", "2b", "3b", "5b", "7b", "8b"];

/// Narrows the hub listing down to the candidates worth resolving.
///
/// The output keeps the hub's popularity order and is never longer than
/// `max`. Running out of qualifying models just yields a shorter list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateFilter {
    pub max: usize,
    /// Lower-cased on construction.
    pub categories: Vec<String>,
    pub small_only: bool,
}

impl CandidateFilter {
    pub fn new(max: usize, categories: &[String], small_only: bool) -> Self {
        Self {
            max,
            categories: categories.iter().map(|c| c.to_lowercase()).collect(),
            small_only,
        }
    }

    pub fn apply(&self, models: &[ModelDescriptor]) -> Vec<ModelDescriptor> {
        let mut candidates = Vec::with_capacity(self.max.min(models.len()));
        for model in models {
            if candidates.len() >= self.max {
                break;
            }
            if self.accepts(&model.id) {
                candidates.push(model.clone());
            } else {
                crate::trace!("Filtered out {}", model.id);
            }
        }
        candidates
    }

    pub fn accepts(&self, model_id: &str) -> bool {
        let id = model_id.to_lowercase();
        matches_category(&id, &self.categories) && (!self.small_only || is_small_model(&id))
    }
}

/// `id` and `categories` must already be lower-case. No categories keeps everything.
pub fn matches_category(id: &str, categories: &[String]) -> bool {
    categories.is_empty() || categories.iter().any(|c| id.contains(c.as_str()))
}

/// Strict allow-list on a lower-cased id: large markers reject first, then a
/// small marker is required.
pub fn is_small_model(id: &str) -> bool {
    if LARGE_SIZE_MARKERS.iter().any(|m| id.contains(m)) {
        return false;
    }
    SMALL_SIZE_MARKERS.iter().any(|m| id.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(ids: &[&str]) -> Vec<ModelDescriptor> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| ModelDescriptor::new(*id, 1_000 - i as u64))
            .collect()
    }

    fn ids(models: &[ModelDescriptor]) -> Vec<&str> {
        models.iter().map(|m| m.id.as_str()).collect()
    }

    #[test]
    fn caps_at_max_and_keeps_hub_order() {
        let models = listing(&["a/one", "b/two", "c/three", "d/four"]);
        let out = CandidateFilter::new(2, &[], false).apply(&models);
        assert_eq!(ids(&out), vec!["a/one", "b/two"]);
    }

    #[test]
    fn fewer_matches_than_requested_is_fine() {
        let models = listing(&["TheBloke/Llama-2-7B-GGUF", "Qwen/Qwen2-0.5B-GGUF"]);
        let out = CandidateFilter::new(5, &["llama".to_string()], false).apply(&models);
        assert_eq!(ids(&out), vec!["TheBloke/Llama-2-7B-GGUF"]);
    }

    #[test]
    fn categories_match_case_insensitively() {
        let models = listing(&[
            "TheBloke/Mistral-7B-Instruct-v0.2-GGUF",
            "bartowski/gemma-2-2b-it-GGUF",
            "microsoft/Phi-3-mini-4k-instruct-gguf",
        ]);
        let out =
            CandidateFilter::new(10, &["MISTRAL".to_string(), "Gemma".to_string()], false)
                .apply(&models);
        assert_eq!(
            ids(&out),
            vec![
                "TheBloke/Mistral-7B-Instruct-v0.2-GGUF",
                "bartowski/gemma-2-2b-it-GGUF"
            ]
        );
    }

    #[test]
    fn small_only_is_a_strict_allow_list() {
        // Neither marker: rejected.
        assert!(!is_small_model("microsoft/phi-3-mini-4k-instruct-gguf"));
        // Large marker wins even with a small one present.
        assert!(!is_small_model("thebloke/llama-2-13b-chat-gguf"));
        assert!(!is_small_model("thebloke/codellama-70b-instruct-gguf"));
        assert!(is_small_model("bartowski/llama-3.2-1b-instruct-gguf"));
        assert!(is_small_model("thebloke/mistral-7b-instruct-v0.2-gguf"));
    }

    #[test]
    fn small_only_filter_drops_large_and_unmarked() {
        let models = listing(&[
            "TheBloke/Llama-2-70B-Chat-GGUF",
            "microsoft/Phi-3-mini-4k-instruct-gguf",
            "bartowski/Llama-3.2-3B-Instruct-GGUF",
            "TheBloke/Mistral-7B-Instruct-v0.2-GGUF",
        ]);
        let out = CandidateFilter::new(10, &[], true).apply(&models);
        assert_eq!(
            ids(&out),
            vec![
                "bartowski/Llama-3.2-3B-Instruct-GGUF",
                "TheBloke/Mistral-7B-Instruct-v0.2-GGUF"
            ]
        );
    }

    #[test]
    fn output_is_an_ordered_subsequence_for_every_cap() {
        let models = listing(&[
            "a/llama-7b",
            "b/other-13b",
            "c/mistral-3b",
            "d/plain",
            "e/gemma-2b",
        ]);
        for max in 0..=models.len() + 1 {
            let out = CandidateFilter::new(max, &[], true).apply(&models);
            assert!(out.len() <= max);
            let mut cursor = models.iter();
            for picked in &out {
                assert!(cursor.any(|m| m == picked), "order broken at max={max}");
            }
        }
    }
}

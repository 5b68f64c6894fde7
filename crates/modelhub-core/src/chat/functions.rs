//! Hosted chat models and their invoke function ids.

const FUNCTIONS: &[(&str, &str)] = &[
    ("Smaug-72B", "008cff6d-4f4c-4514-b61e-bcfad6ba52a7"),
    ("Phi-2B", "6251d6d2-54ee-4486-90f4-2792bf0d3acd"),
    ("Gemma-2B", "5bde8f6f-7e83-4413-a0f2-7b97be33988e"),
    ("Gemma-7B", "1361fa56-61d7-4a12-af32-69a3825746fa"),
    ("Mamba-Chat", "381be320-4721-4664-bd75-58f8783b43c7"),
    ("Code-Llama-70B", "2ae529dc-f728-4a46-9b8d-2697213666d8"),
    ("NV-Llama2-70B-RLHF-Chat", "7b3e3361-4266-41c8-b312-f5e33c81fc92"),
    ("NV-Llama2-70B-SteerLM-Chat", "d6fe6881-973a-4279-a0f8-e1d486c9618d"),
    ("Mixtral-8x7B-Instruct", "8f4118ba-60a8-4e6b-8574-e38a4067a4a3"),
    ("Yi-34B", "347fa3f3-d675-432c-b844-669ef8ee53df"),
    ("Nemotron-3-8B-Chat-SteerLM", "1423ff2f-d1c7-4061-82a7-9e8c67afd43a"),
    ("Llama-2-70B", "0e349b44-440a-44e1-93e9-abe8dcb27158"),
    ("Llama-2-13B", "e0bb7fb9-5333-4a27-8534-c6288f921d3f"),
    ("Code-Llama-13B", "f6a96af4-8bf9-4294-96d6-d71aa787612e"),
    ("Code-Llama-34B", "df2bee43-fb69-42b9-9ee5-f4eabbeaf3a8"),
    ("Mistral-7B-Instruct", "35ec3354-2681-4d0e-a8dd-80325dcf7c63"),
];

/// Invoke function id for a hosted model name.
pub fn function_id(model_name: &str) -> Option<&'static str> {
    FUNCTIONS
        .iter()
        .find(|(name, _)| *name == model_name)
        .map(|(_, id)| *id)
}

/// Names of all hosted chat models.
pub fn model_names() -> impl Iterator<Item = &'static str> {
    FUNCTIONS.iter().map(|(name, _)| *name)
}

//! Instruction-text assembly for the scriptwriting model.

use crate::generator::GenerationRequest;

/// Build the full instruction text sent to the model for one request.
///
/// The model is asked to answer with a JSON array of scene objects; the
/// response is checked by [`crate::parse_scene_payload`] regardless of
/// what the model promises.
pub fn build_generation_prompt(request: &GenerationRequest) -> String {
    format!(
        "You are an expert video editor and scriptwriter.\n\
         Your task is to analyze the user's request for the video file titled \"{source}\" \
         and generate a sequence of scenes with narration.\n\
         The user's request is: \"{prompt}\".\n\
         The narration should be in the following language(s): {language}.\n\
         \n\
         Based on the prompt, identify the key moments and create a compelling narrative.\n\
         For each scene you identify, provide a start time, an end time, and a script for narration.\n\
         The output must be a valid JSON array of scene objects, each with \
         \"startTime\", \"endTime\", and \"narration\" fields.\n\
         Ensure the timestamps are in HH:MM:SS format.",
        source = request.source_name,
        prompt = request.prompt,
        language = request.language.label(),
    )
}

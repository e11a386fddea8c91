//! Prompts sent alongside captured frames.

/// Scene overview instructions.
pub const BASIC_PROMPT: &str = "\
First, describe an overview of the scene in this image, giving a brief \
description of what can be accurately determined on the weather and a \
succinct summary of the scene, with important landmarks. Then, enumerate \
and describe all the individuals and vehicles present. Wherever possible, \
say the individuals' clothing, and the vehicles color and type, as precise \
and accurate as possible.";

/// JSON shape contract for the response.
pub const JSON_PROMPT: &str = r#"
Using this JSON schema for the environment:
  Environment = {
    "weather": str,
    "summary": str
  }
Use this JSON schema for individuals:
  Person = {
    "clothes": str,
    "gender": "male" | "female" | "unsure"
  }
Use this JSON schema for vehicles:
  Vehicle = {
    "type": str,
    "color": str,
    "model": str
  }
Return a single JSON object as follows:
{
  "environment": Environment,
  "persons": [Person],
  "vehicles": [Vehicle]
}
"#;

/// Default prompt: overview instructions plus the JSON shape contract.
pub fn default_prompt() -> String {
    format!("{BASIC_PROMPT}\n{JSON_PROMPT}")
}

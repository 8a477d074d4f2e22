//! Farm-data instructions and the record shape they ask the model to produce.
//!
//! The instructions describe the output shape in prose only. Nothing in the
//! generate or chat paths checks the model's answer against it; callers that
//! want typed data use [`FarmReport::parse`], or structured mode, which sends
//! the schema of [`FarmReport`] along with the request.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::core::LlmError;

pub const FARM_DATA_INSTRUCTIONS: &str = r#"Convert unstructured user input into structured JSON, using the user's message and an uploaded file to create a comprehensive, incremental representation of the user's farm data.

You will receive two inputs:
1. User message: A text description of what the user wants done.
2. Uploaded file: Contains detailed information about the farm's plots and crop data.

The objective is to process the information from all two sources to effectively construct JSON data describing the farm's plots and crops.

# Steps
- **Analyze User Message**: Understand the user's instructions or additional notes related to data conversion.
- **Extract Information from the Uploaded File**: Process the uploaded file to extract any plot and crop data, using explicit notes or content to understand the context.
- **Integrate New Data**: Combine insights from the user's message and the uploaded file to convert the new information into a well-structured JSON format, while appending it incrementally to the pre-existing JSON.

# Output Format
The expected output should be only in this JSON format:

{ "response": string,
"data": [{
   "crop": string,
   "cropVariety": string,
   "area": number,
   "plot": string,
   "plotType": string,
   "areaUnit": string
}]}

"response" refers to the answer in natural language that you choose to provide for the user
"crop" is the name of the crop
"area" is the area of the plot
"plot" is the name/number of the plot

If the attached files do not include any/all of these fields, DO NOT MAKE UP ANY OTHER FIELDS. MAP WHATEVER YOU FIND TO ONLY THESE FIELDS

# Notes
- In case of conflicts (e.g., if data in the file contradicts the current JSON state), prioritize appending new data rather than modifying existing data.
- Retain all existing fields in the current JSON as they are, adding new fields or expanding existing arrays as necessary.
- Ensure that the new information fits logically into the structure, using nested objects or arrays where appropriate.
- For any data not mentioned explicitly but present in the file, infer logical fields and labels to represent it effectively.
- Output specifically in JSON structure with no code blocks, comments, or additional text.
- Expect any number of entries to parse from 1 to 250. You need to parse everything. Do not skip a single line of relevant data"#;

/// Text sent alongside the attached document when a chat is opened.
pub const CHAT_SEED_MESSAGE: &str = "Here is my farm data";

/// One crop planted on one plot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CropPlot {
    /// Name of the crop
    pub crop: Option<String>,
    pub crop_variety: Option<String>,
    /// Area of the plot
    pub area: Option<f64>,
    /// Name or number of the plot
    pub plot: Option<String>,
    pub plot_type: Option<String>,
    pub area_unit: Option<String>,
}

/// The JSON document the instructions ask for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FarmReport {
    /// Natural-language answer for the user
    pub response: String,
    #[serde(default)]
    pub data: Vec<CropPlot>,
}

impl FarmReport {
    /// Parse a model reply, tolerating a Markdown code fence around the JSON.
    pub fn parse(text: &str) -> Result<Self, LlmError> {
        serde_json::from_str(strip_code_fence(text)).map_err(|e| LlmError::Parse {
            message: "Model reply is not a farm report".to_string(),
            source: Box::new(e),
        })
    }
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    // Drop the info string (`json`, `JSON`, ...) if the fence has one.
    let body = match rest.split_once('\n') {
        Some((info, body)) if !info.trim_start().starts_with(['{', '[']) => body,
        _ => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
    };
    body.trim()
}

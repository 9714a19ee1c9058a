//! Prompt construction for the reasoning-service boundary.
//!
//! Every call site embeds its task instructions plus the relevant JSON/text
//! payload in a single prompt. The instructions lean heavily on "do not
//! fabricate" because the output feeds the aggregate record directly.

/// Field names the extraction prompt steers the service toward.
///
/// Keeping a fixed vocabulary is what makes keys line up across documents:
/// the reconciler treats differently named keys as unrelated fields, so the
/// service is asked to prefer these names whenever they apply.
pub const COMMON_TAGS: &[&str] = &[
    "name",
    "firstName",
    "lastName",
    "dateOfBirth",
    "placeOfBirth",
    "gender",
    "nationality",
    "address",
    "email",
    "phone",
    "fatherName",
    "motherName",
    "occupation",
    "education",
    "bloodGroup",
    "nationalId",
    "passportNo",
    "registerNo",
    "dateOfRegistration",
    "dateOfIssue",
    "issuingAuthority",
];

/// System prompt for extracting a labeled field mapping from raw text.
pub fn field_extraction_system() -> String {
    format!(
        "You are an AI assistant who can extract information from given text and label it.\n\
         The text was extracted from a source like an identity card, resume, birth \
         certificate, or a social profile.\n\
         Your task is to label the information properly and return a JSON object.\n\
         \n\
         Example of the JSON format:\n\
         {{\n  \"name\": \"\",\n  \"dateOfBirth\": \"\"\n}}\n\
         \n\
         Points:\n\
         1. Here are the common information tags: {}. Fill them with priority when \
         possible and keep the tag names exactly as given.\n\
         2. If any information is missing, use \"N/A\" for that label.\n\
         3. Even if the text has no labeled information, extract ALL the information \
         possible and label it properly in the JSON object.\n\
         \n\
         Instructions:\n\
         1. Do not add any text before or after the output.\n\
         2. Do not imagine any data. Extract only from the given input text.\n\
         3. Provide only the JSON object as output.\n\
         4. Process spacing and gaps carefully for name, address, date of birth, etc.\n\
         \n\
         Note:\n\
         1. For a birth certificate, also read the register number, date of \
         registration, and date of issue.",
        COMMON_TAGS.join(", ")
    )
}

/// User prompt wrapping the raw document text.
pub fn field_extraction_user(input: &str) -> String {
    format!("Input text is given below:\n<INPUT_START>\n{input}\n<INPUT_END>")
}

/// System prompt for extracting form labels from document text.
pub fn label_extraction_system(text: &str) -> String {
    format!(
        "You are an AI assistant that extracts form labels from the given text.\n\
         A form label is the text before an input field, like \"Name:\", \
         \"Date of Birth:\", \"Email:\", or a question.\n\
         Do NOT include extra phrases like \"Here is the list of form labels\".\n\
         Only extract the labels as a pure list, without any introductory text, \
         explanations, numbering, or formatting.\n\
         Each label must be on a new line. Do not return empty lines or \
         unnecessary words.\n\
         \n\
         Example:\n\
         Input:\n\
         \"Name: John Doe\n\
         Date of Birth: 12/11/2002\n\
         Phone: 123456789\"\n\
         \n\
         Output:\n\
         Name\n\
         Date of Birth\n\
         Phone\n\
         \n\
         Extract only the labels from the following text:\n{text}"
    )
}

/// User prompt for the label-extraction call.
pub fn label_extraction_user() -> String {
    "Extract only form labels from the given text.".to_string()
}

/// Prompt asking the service to match a label list against the record.
///
/// `labels_json` and `record_json` are pretty-printed JSON payloads.
pub fn label_match_prompt(labels_json: &str, record_json: &str) -> String {
    format!(
        "You are given two JSON documents:\n\
         \n\
         1. Labels JSON: a list of labels that need to be mapped to values.\n\
         2. Info JSON: extracted personal information.\n\
         \n\
         Your task:\n\
         - Match each label from the Labels JSON with the best possible value \
         from the Info JSON.\n\
         - Give full information. Example: a place of birth should be complete, \
         not abbreviated.\n\
         - If a label has no corresponding value, return \"N/A\" for it.\n\
         - Format the result as one line per label:\n\
         \n\
         Label Name: Information\n\
         \n\
         Example output:\n\
         Name: John Doe\n\
         Date of Birth: 12/11/2002\n\
         Address: 123 Main Street\n\
         Job Title: Software Engineer\n\
         \n\
         Labels JSON:\n{labels_json}\n\
         \n\
         Info JSON:\n{record_json}\n\
         \n\
         Return only the formatted text output."
    )
}

/// System prompt for ad-hoc queries against the record.
///
/// `record_json` is the aggregate record as a JSON payload.
pub fn query_system(record_json: &str) -> String {
    format!(
        "You are a helpful AI assistant who can extract meaningful data from \
         given text.\n\
         You will be given JSON data containing personal details. Extract only \
         the information best suited for the query.\n\
         For example, if asked for the name of the person, combine the first \
         name and last name and return a single full name.\n\
         If the information is not available, return N/A.\n\
         \n\
         Instructions:\n\
         1. Do not add any extra text before or after the output.\n\
         2. Do not imagine any data. Extract only from the given data.\n\
         3. Provide only the extracted data.\n\
         4. If a name is asked for, give the full name.\n\
         5. Process spacing and gaps carefully for name, address, date of birth, etc.\n\
         \n\
         Here is the given data:\n\
         <DATA_START>\n{record_json}\n<DATA_END>\n\
         \n\
         Just give the value. Do not add any text before or after.\n\
         \n\
         Note:\n\
         issuer = issuing authority"
    )
}

/// User prompt carrying the natural-language question.
pub fn query_user(question: &str) -> String {
    format!(
        "Extract the {question} of the person from the given data please. \
         Extract only if it is available in the given data. Do not calculate or \
         create any information. If you do not find it, simply say not found."
    )
}

/// Instruction for the OCR call on image documents.
pub const IMAGE_OCR_INSTRUCTION: &str =
    "Extract all readable text from this image. Return only the extracted text, nothing else.";

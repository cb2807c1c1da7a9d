//! Built-in templates for each variant.

/// Medical entity extraction. Output columns: Entity, Label, Context.
pub const MEDICAL_TEMPLATE: &str = r#"You are a medical expert and good at English. Extract all the medical entities from the given tweet and assign the appropriate medical entity labels.

Input text: {text}

Please format your response as a markdown table with the following columns:
| Entity | Label | Context |

Only include medical terms, conditions, symptoms, medications, or healthcare-related entities.
"#;

/// Named entity and geography extraction.
/// Output columns: Name, Entity_Type, City, Country, Country_Code.
pub const ENTITIES_TEMPLATE: &str = r#"You are an expert in entity extraction and natural language processing. 
Extract named entities from the given text, focusing on people, organizations, locations, and associated geographic information.

Input text: {text}

Provide a structured analysis in the following markdown table format:
| Name | Entity_Type | City | Country | Country_Code |

Guidelines:
- Name: The extracted entity name
- Entity_Type: One of [PERSON, ORGANIZATION, LOCATION]
- City: Associated city (if applicable)
- Country: Full country name (if applicable)
- Country_Code: ISO 2-letter country code (if applicable)

Example:
For text: "Tim Cook from Apple in Cupertino, USA announced..."
| Tim Cook | PERSON | Cupertino | United States | US |
| Apple | ORGANIZATION | Cupertino | United States | US |

Only include relevant named entities. Leave fields blank with '-' if not applicable.
Ensure all country codes are valid ISO 2-letter codes."#;

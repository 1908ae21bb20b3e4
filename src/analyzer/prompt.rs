//! Prompt construction for model-backed analysis

use crate::ProductInput;
use std::fmt::Write;

/// Build the instruction prompt for a sustainability analysis.
///
/// Price and materials lines are omitted when empty.
pub fn build_prompt(product: &ProductInput) -> String {
    let mut prompt = String::from(
        "You are a sustainability expert. Analyze this product and return JSON only.\n\n",
    );
    let _ = writeln!(prompt, "Product: {}", product.title);
    let _ = writeln!(prompt, "Brand: {}", product.brand);
    if !product.price.is_empty() {
        let _ = writeln!(prompt, "Price: {}", product.price);
    }
    if !product.materials.is_empty() {
        let _ = writeln!(prompt, "Materials: {}", product.materials);
    }
    prompt.push_str(
        "\nScore based on: recycled content, natural materials, durability, \
         certifications, packaging, manufacturing impact, shipping, end-of-life.\n\n",
    );
    prompt.push_str("Return this exact JSON structure:\n");
    prompt.push_str("{\n");
    prompt.push_str("  \"greenScore\": <0-100>,\n");
    prompt.push_str("  \"positives\": [\"<aspect1>\", \"<aspect2>\", \"<aspect3>\"],\n");
    prompt.push_str("  \"negatives\": [\"<aspect1>\", \"<aspect2>\", \"<aspect3>\"],\n");
    prompt.push_str("  \"recommendation\": \"<one sentence>\"\n");
    prompt.push_str("}\n");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_includes_product_fields() {
        let prompt = build_prompt(
            &ProductInput::new("Bamboo Toothbrush")
                .with_brand("Humble")
                .with_price("$4.99")
                .with_materials("bamboo, nylon"),
        );
        assert!(prompt.contains("Product: Bamboo Toothbrush\n"));
        assert!(prompt.contains("Brand: Humble\n"));
        assert!(prompt.contains("Price: $4.99\n"));
        assert!(prompt.contains("Materials: bamboo, nylon\n"));
        assert!(prompt.contains("\"greenScore\": <0-100>"));
    }

    #[test]
    fn test_prompt_omits_empty_optional_fields() {
        let prompt = build_prompt(&ProductInput::new("Mug"));
        assert!(prompt.contains("Brand: \n"));
        assert!(!prompt.contains("Price:"));
        assert!(!prompt.contains("Materials:"));
    }
}

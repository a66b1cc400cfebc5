use crate::server::response::{ApiError, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

const MAX_NAME_LEN: usize = 255;

/// Apply defaults and bounds-check pagination before any query runs.
pub fn validate_pagination(
    page: Option<u32>,
    per_page: Option<u32>,
) -> Result<(u32, u32), ApiError> {
    let page = page.unwrap_or(1);
    let per_page = per_page.unwrap_or(DEFAULT_PAGE_SIZE);

    if page < 1 {
        return Err(ApiError::bad_request("page must be at least 1"));
    }
    if per_page < 1 {
        return Err(ApiError::bad_request("per_page must be at least 1"));
    }
    if per_page > MAX_PAGE_SIZE {
        return Err(ApiError::bad_request(format!(
            "per_page cannot exceed {MAX_PAGE_SIZE}"
        )));
    }
    Ok((page, per_page))
}

fn validate_name(name: &str, entity: &str) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::bad_request(format!(
            "{entity} name cannot be empty"
        )));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(ApiError::bad_request(format!(
            "{entity} name cannot exceed {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_category_name(name: &str) -> Result<(), ApiError> {
    validate_name(name, "Category")
}

pub fn validate_developer_name(name: &str) -> Result<(), ApiError> {
    validate_name(name, "Developer")
}

pub fn validate_developer_email(email: &str) -> Result<(), ApiError> {
    if email.trim().is_empty() {
        return Err(ApiError::bad_request("Developer email cannot be empty"));
    }
    if email.len() > MAX_NAME_LEN {
        return Err(ApiError::bad_request(format!(
            "Developer email cannot exceed {MAX_NAME_LEN} characters"
        )));
    }
    if !email.contains('@') {
        return Err(ApiError::bad_request("Developer email must contain '@'"));
    }
    Ok(())
}

pub fn validate_app_name(name: &str) -> Result<(), ApiError> {
    validate_name(name, "App")
}

/// Ratings live on the store's 0-5 scale when present.
pub fn validate_rating(rating: Option<f64>) -> Result<(), ApiError> {
    if let Some(value) = rating {
        if !(0.0..=5.0).contains(&value) {
            return Err(ApiError::bad_request("rating must be between 0 and 5"));
        }
    }
    Ok(())
}

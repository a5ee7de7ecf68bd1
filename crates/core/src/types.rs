/// Backend primary keys are integer identifiers assigned by the REST API.
pub type DbId = i64;

//! Adoption application for one catalog pet

use crate::payload::{Payload, PayloadBuilder, NOT_APPLICABLE, NOT_PROVIDED, NOT_SPECIFIED};
use crate::pipeline::Redirect;
use crate::schema::{FieldSpec, FormKind, FormSchema};
use crate::values::FormValues;
use heaven_catalog::Pet;

pub const REDIRECT: Redirect = Redirect { to: "/pets", after_ms: 3000 };

const SELECT_AN_OPTION: &str = "Please select an option";
const YES_NO: &[(&str, &str)] = &[("yes", "Yes"), ("no", "No")];

pub(crate) fn schema() -> FormSchema {
    FormSchema {
        kind: FormKind::Adoption,
        title: "Adoption Application",
        fields: vec![
            FieldSpec::text("fullName", "Full Name").required("Full name is required"),
            FieldSpec::email("email", "Email").required("Email is required"),
            FieldSpec::tel("phone", "Phone Number").required("Phone number is required"),
            FieldSpec::text("address", "Street Address").required("Address is required"),
            FieldSpec::text("city", "City").required("City is required"),
            FieldSpec::text("zipCode", "Zip Code"),
            FieldSpec::select(
                "housingType",
                "Housing Type",
                &[
                    ("house", "House"),
                    ("apartment", "Apartment"),
                    ("condo", "Condo"),
                    ("townhouse", "Townhouse"),
                ],
            )
            .required("Please select housing type"),
            FieldSpec::select(
                "hasYard",
                "Do you have a yard?",
                &[("yes-fenced", "Yes, fenced"), ("yes-unfenced", "Yes, unfenced"), ("no", "No")],
            )
            .required(SELECT_AN_OPTION),
            FieldSpec::select("hasOtherPets", "Do you have other pets?", YES_NO).required(SELECT_AN_OPTION),
            FieldSpec::text("otherPetsDetails", "Please provide details").visible_when("hasOtherPets", "yes"),
            FieldSpec::select("hasChildren", "Do you have children?", YES_NO).required(SELECT_AN_OPTION),
            FieldSpec::text("childrenAges", "Children's ages").visible_when("hasChildren", "yes"),
            FieldSpec::textarea("experience", "Previous pet ownership experience"),
            FieldSpec::text("hoursAlone", "How many hours will the pet be alone daily?")
                .required("Please provide this information"),
            FieldSpec::textarea("reason", "Why do you want to adopt?").required("Please tell us why you want to adopt"),
            FieldSpec::text("veterinarian", "Veterinarian contact (if applicable)"),
            FieldSpec::textarea("references", "Personal references"),
        ],
    }
}

/// Applicant answers plus the pet's catalog details
pub fn payload(pet: &Pet, values: &FormValues, operator_email: &str) -> Payload {
    let pet_age = pet.age.map_or_else(|| NOT_SPECIFIED.to_string(), |age| age.to_string());

    PayloadBuilder::new(values, operator_email)
        .literal("pet_name", pet.name.as_str())
        .literal("pet_breed", pet.breed.as_str())
        .literal("pet_age", pet_age)
        .literal("pet_gender", pet.gender.as_str())
        .field("applicant_name", "fullName")
        .field("applicant_email", "email")
        .field("applicant_phone", "phone")
        .field("address", "address")
        .field("city", "city")
        .field_or("zip_code", "zipCode", NOT_PROVIDED)
        .field("housing_type", "housingType")
        .field("has_yard", "hasYard")
        .field("has_other_pets", "hasOtherPets")
        .field_or("other_pets_details", "otherPetsDetails", NOT_APPLICABLE)
        .field("has_children", "hasChildren")
        .field_or("children_ages", "childrenAges", NOT_APPLICABLE)
        .field_or("experience", "experience", NOT_PROVIDED)
        .field("hours_alone", "hoursAlone")
        .field("reason", "reason")
        .field_or("veterinarian", "veterinarian", NOT_PROVIDED)
        .field_or("references", "references", NOT_PROVIDED)
        .build()
}

//! Request to surrender a pet to the shelter

use crate::payload::{non_blank, yes_no, Payload, PayloadBuilder, NONE, NOT_SPECIFIED};
use crate::pipeline::Redirect;
use crate::schema::{FieldSpec, FormKind, FormSchema};
use crate::values::FormValues;

pub const REDIRECT: Redirect = Redirect { to: "/", after_ms: 3000 };

pub(crate) fn schema() -> FormSchema {
    FormSchema {
        kind: FormKind::Release,
        title: "Pet Release Request",
        fields: vec![
            FieldSpec::text("ownerName", "Your Name").required("Your name is required"),
            FieldSpec::email("email", "Email").required("Email is required"),
            FieldSpec::tel("phone", "Phone Number").required("Phone number is required"),
            FieldSpec::text("address", "Address (Optional)"),
            FieldSpec::text("petName", "Pet's Name").required("Pet name is required"),
            FieldSpec::select("petType", "Pet Type", &[("dog", "Dog"), ("cat", "Cat")])
                .required("Please select pet type"),
            FieldSpec::text("breed", "Breed").required("Breed is required"),
            FieldSpec::text("age", "Age").required("Age is required"),
            FieldSpec::select("gender", "Gender", &[("male", "Male"), ("female", "Female")])
                .required("Please select gender"),
            FieldSpec::select("size", "Size", &[("small", "Small"), ("medium", "Medium"), ("large", "Large")]),
            FieldSpec::select("energyLevel", "Energy level", &[("low", "Low"), ("medium", "Medium"), ("high", "High")]),
            FieldSpec::select(
                "spayedNeutered",
                "Spayed/Neutered?",
                &[("yes", "Yes"), ("no", "No"), ("unknown", "Unknown")],
            ),
            FieldSpec::select(
                "vaccinated",
                "Up to date on vaccinations?",
                &[("yes", "Yes"), ("no", "No"), ("partial", "Partially"), ("unknown", "Unknown")],
            ),
            FieldSpec::textarea("medicalConditions", "Medical conditions or special needs"),
            FieldSpec::textarea("temperament", "Describe your pet's temperament"),
            FieldSpec::checkbox("goodWithChildren", "Children"),
            FieldSpec::checkbox("goodWithDogs", "Dogs"),
            FieldSpec::checkbox("goodWithCats", "Cats"),
            FieldSpec::textarea("reason", "Why do you need to release your pet?")
                .required("Please tell us why you need to release your pet"),
            FieldSpec::textarea("idealHome", "What would be an ideal home for your pet?"),
            FieldSpec::textarea("additionalInfo", "Additional information"),
        ],
    }
}

pub fn payload(values: &FormValues, operator_email: &str) -> Payload {
    let dogs = values.flag("goodWithDogs");
    let cats = values.flag("goodWithCats");
    let good_with_pets = if dogs || cats {
        format!("Dogs: {}, Cats: {}", yes_no(dogs), yes_no(cats))
    } else {
        "No".to_string()
    };

    PayloadBuilder::new(values, operator_email)
        .field("owner_name", "ownerName")
        .field("owner_email", "email")
        .field("owner_phone", "phone")
        .field("owner_address", "address")
        .field("pet_name", "petName")
        .field("pet_type", "petType")
        .field("pet_breed", "breed")
        .field("pet_age", "age")
        .field("pet_gender", "gender")
        .field_or("pet_size", "size", NOT_SPECIFIED)
        .field("vaccinated", "vaccinated")
        .field("neutered", "spayedNeutered")
        .field_or("medical_conditions", "medicalConditions", NONE)
        .literal("good_with_kids", yes_no(values.flag("goodWithChildren")))
        .literal("good_with_pets", good_with_pets)
        .field_or("energy_level", "energyLevel", NOT_SPECIFIED)
        .field_or("temperament", "temperament", NOT_SPECIFIED)
        .field("reason", "reason")
        .literal("additional_notes", additional_notes(values))
        .build()
}

fn additional_notes(values: &FormValues) -> String {
    let mut notes = String::new();
    if let Some(ideal_home) = non_blank(values.text("idealHome")) {
        notes.push_str("Ideal Home: ");
        notes.push_str(ideal_home);
    }
    if let Some(info) = non_blank(values.text("additionalInfo")) {
        notes.push_str("\n\nAdditional Info: ");
        notes.push_str(info);
    }
    notes
}

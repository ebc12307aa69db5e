//! Membership registration. Nothing is emailed; a successful submission
//! yields the member's [`Identity`].

use crate::identity::Identity;
use crate::payload::non_blank;
use crate::pipeline::Redirect;
use crate::schema::{FieldSpec, FormKind, FormSchema};
use crate::values::FormValues;

pub const REDIRECT: Redirect = Redirect { to: "/", after_ms: 2500 };

pub(crate) fn schema() -> FormSchema {
    FormSchema {
        kind: FormKind::Membership,
        title: "Become a Pet Heaven Member",
        fields: vec![
            FieldSpec::text("name", "Full Name").required("Name is required"),
            FieldSpec::email("email", "Email").required("Email is required"),
            FieldSpec::tel("phone", "Phone Number").required("Phone number is required"),
            FieldSpec::text("address", "Address (Optional)"),
            FieldSpec::text("city", "City"),
            FieldSpec::text("zipCode", "Zip Code"),
            FieldSpec::checkbox("interestAdoption", "Adoption"),
            FieldSpec::checkbox("interestVolunteering", "Volunteering"),
            FieldSpec::checkbox("interestDonations", "Donations"),
            FieldSpec::checkbox("interestFostering", "Fostering"),
            FieldSpec::checkbox("interestEvents", "Events"),
            FieldSpec::select(
                "preferredContact",
                "Preferred Contact Method",
                &[("email", "Email"), ("phone", "Phone"), ("both", "Both")],
            ),
            FieldSpec::select(
                "hearAboutUs",
                "How did you hear about us?",
                &[
                    ("social-media", "Social Media"),
                    ("friend", "Friend/Family"),
                    ("search", "Online Search"),
                    ("event", "Community Event"),
                    ("other", "Other"),
                ],
            ),
            FieldSpec::textarea("message", "Message (Optional)"),
        ],
    }
}

pub fn identity(values: &FormValues) -> Identity {
    Identity {
        name: non_blank(values.text("name")).map(str::to_string),
        email: non_blank(values.text("email")).map(str::to_string),
    }
}

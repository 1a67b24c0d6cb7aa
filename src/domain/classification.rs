//! Closed diagnostic vocabularies
//!
//! Every enum serializes to its human-readable wire label, both in
//! persistence records and in JSON payloads. The labels are the ones the
//! ingestion side writes (Brazilian Portuguese); unknown labels are
//! rejected rather than passed through as free-form strings.

use crate::domain::errors::LaudoError;

/// Defines an enum with a fixed label table: `label()`, `from_label()`,
/// `parse()`, `Display` and label-based serde impls.
macro_rules! labeled_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Human-readable wire label
            pub fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }

            /// Parses a wire label; unknown labels yield `None`
            pub fn from_label(label: &str) -> Option<Self> {
                match label {
                    $($label => Some(Self::$variant),)+
                    _ => None,
                }
            }

            /// Parses a wire label, rejecting unknown values
            pub fn parse(label: &str) -> crate::domain::result::Result<Self> {
                Self::from_label(label).ok_or_else(|| {
                    LaudoError::Validation(format!(
                        concat!("unknown ", stringify!($name), " label '{}'"),
                        label
                    ))
                })
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(
                &self,
                serializer: S,
            ) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.label())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(
                deserializer: D,
            ) -> std::result::Result<Self, D::Error> {
                let label = String::deserialize(deserializer)?;
                Self::from_label(&label).ok_or_else(|| {
                    serde::de::Error::custom(format!(
                        concat!("unknown ", stringify!($name), " label '{}'"),
                        label
                    ))
                })
            }
        }
    };
}

labeled_enum! {
    /// Diagnostic classification of an ECG report
    ReportClassification {
        Normal => "ECG normal",
        SinusTachycardia => "Taquicardia sinusal",
        SinusBradycardia => "Bradicardia sinusal",
        SinusArrhythmia => "Arritmia sinusal",
        FirstDegreeAvBlock => "Bloqueio atrioventricular de 1º grau",
        SecondDegreeAvBlockMobitzI => "Bloqueio atrioventricular de 2º grau tipo Mobitz I",
        SecondDegreeAvBlockMobitzII => "Bloqueio atrioventricular de 2º grau tipo Mobitz II",
        ThirdDegreeAvBlock => "Bloqueio atrioventricular de 3º grau",
        CompleteRightBundleBranchBlock => "Bloqueio de ramo direito completo",
        CompleteLeftBundleBranchBlock => "Bloqueio de ramo esquerdo completo",
        AtrialFibrillation => "Fibrilação atrial",
        AtrialFlutter => "Flutter atrial",
        SupraventricularTachycardia => "Taquicardia supraventricular",
        VentricularTachycardia => "Taquicardia ventricular",
        VentricularFibrillation => "Fibrilação ventricular",
        AcuteMyocardialInfarction => "Infarto agudo do miocárdio",
        SubendocardialIschemia => "Isquemia subendocárdica",
        LeftVentricularHypertrophy => "Hipertrofia do ventrículo esquerdo",
        RightVentricularHypertrophy => "Hipertrofia do ventrículo direito",
        LeftAxisDeviation => "Desvio do eixo elétrico para a esquerda",
        RightAxisDeviation => "Desvio do eixo elétrico para a direita",
        NonspecificStTChanges => "Alterações inespecíficas do segmento ST-T",
        PacemakerPresence => "Presença de marcapasso",
        Inconclusive => "ECG inconclusivo",
    }
}

labeled_enum! {
    /// Finding category of a segmentation annotation
    ///
    /// Same vocabulary as [`ReportClassification`] without the inconclusive
    /// variant; an inconclusive exam has no finding to locate.
    SegmentationCategory {
        Normal => "Normal",
        SinusTachycardia => "Taquicardia sinusal",
        SinusBradycardia => "Bradicardia sinusal",
        SinusArrhythmia => "Arritmia sinusal",
        FirstDegreeAvBlock => "Bloqueio atrioventricular de 1º grau",
        SecondDegreeAvBlockMobitzI => "Bloqueio atrioventricular de 2º grau tipo Mobitz I",
        SecondDegreeAvBlockMobitzII => "Bloqueio atrioventricular de 2º grau tipo Mobitz II",
        ThirdDegreeAvBlock => "Bloqueio atrioventricular de 3º grau",
        CompleteRightBundleBranchBlock => "Bloqueio de ramo direito completo",
        CompleteLeftBundleBranchBlock => "Bloqueio de ramo esquerdo completo",
        AtrialFibrillation => "Fibrilação atrial",
        AtrialFlutter => "Flutter atrial",
        SupraventricularTachycardia => "Taquicardia supraventricular",
        VentricularTachycardia => "Taquicardia ventricular",
        VentricularFibrillation => "Fibrilação ventricular",
        AcuteMyocardialInfarction => "Infarto agudo do miocárdio",
        SubendocardialIschemia => "Isquemia subendocárdica",
        LeftVentricularHypertrophy => "Hipertrofia do ventrículo esquerdo",
        RightVentricularHypertrophy => "Hipertrofia do ventrículo direito",
        LeftAxisDeviation => "Desvio do eixo elétrico para a esquerda",
        RightAxisDeviation => "Desvio do eixo elétrico para a direita",
        NonspecificStTChanges => "Alterações inespecíficas do segmento ST-T",
        PacemakerPresence => "Presença de marcapasso",
    }
}

labeled_enum! {
    /// Patient gender as recorded on the exam
    Gender {
        Male => "Masculino",
        Female => "Feminino",
        Other => "Outro",
    }
}

labeled_enum! {
    /// Role of an authenticated user
    UserRole {
        Doctor => "doctor",
        DoctorManager => "doctor-manager",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("ECG normal", ReportClassification::Normal)]
    #[test_case("ECG inconclusivo", ReportClassification::Inconclusive)]
    #[test_case("Flutter atrial", ReportClassification::AtrialFlutter)]
    #[test_case(
        "Bloqueio atrioventricular de 2º grau tipo Mobitz II",
        ReportClassification::SecondDegreeAvBlockMobitzII
    )]
    fn test_classification_label_round_trip(label: &str, expected: ReportClassification) {
        let parsed = ReportClassification::parse(label).unwrap();
        assert_eq!(parsed, expected);
        assert_eq!(parsed.label(), label);
    }

    #[test]
    fn test_classification_rejects_unknown_label() {
        assert!(ReportClassification::parse("Sinus rhythm").is_err());
    }

    #[test]
    fn test_segmentation_category_rejects_inconclusive() {
        // The segmentation vocabulary has no inconclusive variant.
        assert!(SegmentationCategory::from_label("ECG inconclusivo").is_none());
        // Its normal label also differs from the report one.
        assert_eq!(
            SegmentationCategory::parse("Normal").unwrap(),
            SegmentationCategory::Normal
        );
        assert!(SegmentationCategory::from_label("ECG normal").is_none());
    }

    #[test]
    fn test_gender_labels() {
        assert_eq!(Gender::parse("Feminino").unwrap(), Gender::Female);
        assert!(Gender::parse("female").is_err());
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&ReportClassification::AtrialFibrillation).unwrap();
        assert_eq!(json, "\"Fibrilação atrial\"");

        let back: ReportClassification = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ReportClassification::AtrialFibrillation);

        let err = serde_json::from_str::<Gender>("\"unknown\"");
        assert!(err.is_err());
    }

    #[test]
    fn test_user_role_labels() {
        assert_eq!(UserRole::parse("doctor-manager").unwrap(), UserRole::DoctorManager);
    }
}

use std::fmt;

/// Exception family. Each category owns a block of 100 numeric codes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    Abstract,
    Signal,
    Task,
    Feature,
    Factory,
    Dynamic,
    Traces,
    Tools,
    YamlCpp,
}

impl Category {
    pub fn base(&self) -> i32 {
        match self {
            Category::Abstract => 0,
            Category::Signal => 100,
            Category::Task => 200,
            Category::Feature => 300,
            Category::Factory => 400,
            Category::Dynamic => 500,
            Category::Traces => 600,
            Category::Tools => 700,
            Category::YamlCpp => 800,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Category::Abstract => "Abstract",
            Category::Signal => "Signal",
            Category::Task => "Task",
            Category::Feature => "Feature",
            Category::Factory => "Factory",
            Category::Dynamic => "Dynamic",
            Category::Traces => "Traces",
            Category::Tools => "Tools",
            Category::YamlCpp => "YamlCpp",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Sub-codes are laid out as offsets from the category base, Generic first.
macro_rules! category_codes {
    ($(#[$meta:meta])* $name:ident => $category:ident { $($variant:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const CATEGORY: Category = Category::$category;

            pub fn code(&self) -> i32 {
                Self::CATEGORY.base() + *self as i32
            }
        }

        impl From<$name> for ErrorCode {
            fn from(code: $name) -> ErrorCode {
                ErrorCode::$category(code)
            }
        }
    };
}

category_codes! {
    /// Raised by the entity, signal and function factory.
    FactoryError => Factory {
        Generic,
        UnreferedObject,
        UnreferedSignal,
        UnreferedFunction,
        DynamicLoading,
        SignalConflict,
        FunctionConflict,
        ObjectConflict,
        SyntaxError,
        ReadFile,
    }
}

category_codes! {
    SignalError => Signal {
        Generic,
        ReadwriteLock,
        CopyNotInitialized,
        NotInitialized,
        PlugImpossible,
        SetImpossible,
        BadCast,
    }
}

category_codes! {
    TaskError => Task {
        Generic,
        EmptyList,
        NonAdequateFeatures,
        MatrixSize,
        BoundType,
        ParserMultiBound,
    }
}

category_codes! {
    FeatureError => Feature {
        Generic,
        BadInit,
        UncompatibleSize,
    }
}

category_codes! {
    DynamicError => Dynamic {
        Generic,
        CantDestroySignal,
        JointRank,
        DynamicJrl,
        JointSize,
        Integration,
    }
}

category_codes! {
    ToolsError => Tools {
        Generic,
        Corba,
        KalmanSize,
        PyShellPtr,
    }
}

category_codes! {
    /// Failures while reading values out of a YAML parameter file.
    YamlCppError => YamlCpp {
        Generic,
        ParsingBool,
        ParsingFloat,
        ParsingDouble,
        ParsingEigen,
        ParsingString,
        ParsingUnsigned,
    }
}

/// What went wrong, grouped by category. Match on this at handling sites.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Abstract,
    Signal(SignalError),
    Task(TaskError),
    Feature(FeatureError),
    Factory(FactoryError),
    Dynamic(DynamicError),
    Traces,
    Tools(ToolsError),
    YamlCpp(YamlCppError),
}

impl ErrorCode {
    pub fn category(&self) -> Category {
        match self {
            ErrorCode::Abstract => Category::Abstract,
            ErrorCode::Signal(_) => Category::Signal,
            ErrorCode::Task(_) => Category::Task,
            ErrorCode::Feature(_) => Category::Feature,
            ErrorCode::Factory(_) => Category::Factory,
            ErrorCode::Dynamic(_) => Category::Dynamic,
            ErrorCode::Traces => Category::Traces,
            ErrorCode::Tools(_) => Category::Tools,
            ErrorCode::YamlCpp(_) => Category::YamlCpp,
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            ErrorCode::Abstract | ErrorCode::Traces => self.category().base(),
            ErrorCode::Signal(c) => c.code(),
            ErrorCode::Task(c) => c.code(),
            ErrorCode::Feature(c) => c.code(),
            ErrorCode::Factory(c) => c.code(),
            ErrorCode::Dynamic(c) => c.code(),
            ErrorCode::Tools(c) => c.code(),
            ErrorCode::YamlCpp(c) => c.code(),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}[#{}]", self.category(), self.code())
    }
}

#[test]
fn test_factory_codes() {
    assert_eq!(FactoryError::Generic.code(), 400);
    assert_eq!(FactoryError::UnreferedObject.code(), 401);
    assert_eq!(FactoryError::SyntaxError.code(), 408);
    assert_eq!(FactoryError::ReadFile.code(), 409);
}

#[test]
fn test_sibling_codes() {
    assert_eq!(SignalError::BadCast.code(), 106);
    assert_eq!(TaskError::ParserMultiBound.code(), 205);
    assert_eq!(FeatureError::UncompatibleSize.code(), 302);
    assert_eq!(DynamicError::Integration.code(), 505);
    assert_eq!(ToolsError::PyShellPtr.code(), 703);
    assert_eq!(YamlCppError::ParsingUnsigned.code(), 806);
}

#[test]
fn test_error_code_dispatch() {
    let code: ErrorCode = FactoryError::DynamicLoading.into();
    assert_eq!(code, ErrorCode::Factory(FactoryError::DynamicLoading));
    assert_eq!(code.category(), Category::Factory);
    assert_eq!(code.code(), 404);
    assert_eq!(code.to_string(), "Factory[#404]");

    assert_eq!(ErrorCode::Abstract.code(), 0);
    assert_eq!(ErrorCode::Traces.code(), 600);
    assert_eq!(ErrorCode::Traces.category().name(), "Traces");
}
